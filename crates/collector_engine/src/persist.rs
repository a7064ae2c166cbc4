use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Create the directory holding `file` if it does not exist yet.
pub(crate) fn ensure_parent_dir(file: &Path) -> io::Result<()> {
    match file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            if dir.exists() && !dir.is_dir() {
                return Err(io::Error::other(format!(
                    "{} is not a directory",
                    dir.display()
                )));
            }
            fs::create_dir_all(dir)
        }
        _ => Ok(()),
    }
}

/// Replace `target` with `content` via a temp file in the same directory and a rename.
pub(crate) fn replace_atomically(target: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(target).map_err(|err| err.error)?;
    Ok(())
}
