use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use collector_core::{EnrichedPosting, Identity, StoredRecord};
use collector_logging::{collector_debug, collector_info, collector_warn};
use thiserror::Error;

use crate::persist::{ensure_parent_dir, replace_atomically};

/// Storage header. Column order is the storage schema.
pub const COLUMNS: [&str; StoredRecord::FIELD_COUNT] = [
    "collected_at",
    "job_title",
    "company_name",
    "location",
    "required_degree",
    "required_years_experience",
    "job_link",
];

const LINK_COLUMN: &str = "job_link";

/// Produces the `collected_at` stamp for a batch.
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Append-only CSV file of postings, unique by [`Identity`].
pub struct CsvStore {
    path: PathBuf,
    clock: Clock,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, Arc::new(|| Utc::now().to_rfc3339()))
    }

    pub fn with_clock(path: impl Into<PathBuf>, clock: Clock) -> Self {
        Self {
            path: path.into(),
            clock,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with its header if it is missing or empty.
    pub fn ensure_exists(&self) -> Result<(), StoreError> {
        ensure_parent_dir(&self.path)?;
        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                if fs::metadata(&self.path)?.len() > 0 {
                    return Ok(());
                }
                OpenOptions::new().append(true).open(&self.path)?
            }
            Err(err) => return Err(err.into()),
        };

        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(COLUMNS)?;
        writer.flush()?;
        collector_info!("Initialized store at {:?}", self.path);
        Ok(())
    }

    /// Non-empty identities already stored. Any unreadable content, including a
    /// single bad row, makes the whole store count as empty.
    pub fn load_identities(&self) -> HashSet<Identity> {
        let mut identities = HashSet::new();
        let mut reader = match self.reader() {
            Ok(reader) => reader,
            Err(err) if is_not_found(&err) => return identities,
            Err(err) => {
                collector_warn!("Cannot read store {:?}, treating as empty: {}", self.path, err);
                return identities;
            }
        };
        let Some(link_idx) = column_index(&mut reader, LINK_COLUMN) else {
            collector_warn!(
                "Store {:?} has no {} column, treating as empty",
                self.path,
                LINK_COLUMN
            );
            return identities;
        };

        for result in reader.records() {
            match result {
                Ok(record) => {
                    if let Some(identity) = record.get(link_idx).and_then(Identity::from_link) {
                        identities.insert(identity);
                    }
                }
                Err(err) => {
                    collector_warn!(
                        "Unreadable row in store {:?}, treating as empty: {}",
                        self.path,
                        err
                    );
                    return HashSet::new();
                }
            }
        }
        identities
    }

    /// Appends the postings not yet stored and returns how many were written.
    ///
    /// Duplicates of stored rows and of earlier postings in the same batch are
    /// dropped; postings without an identity are always written. Any write is
    /// followed by a [`CsvStore::compact`] pass.
    pub fn append_batch(&self, postings: Vec<EnrichedPosting>) -> Result<usize, StoreError> {
        self.ensure_exists()?;
        let mut seen = self.load_identities();
        let collected_at = (self.clock)();
        let total = postings.len();

        let mut accepted = Vec::new();
        for posting in postings {
            if let Some(identity) = posting.identity() {
                if !seen.insert(identity.clone()) {
                    collector_debug!("Skipping duplicate job link {}", identity);
                    continue;
                }
            }
            accepted.push(StoredRecord::new(collected_at.clone(), posting));
        }

        if accepted.is_empty() {
            collector_info!(
                "All {} collected postings were duplicates; store unchanged",
                total
            );
            return Ok(0);
        }

        let mut file = OpenOptions::new().read(true).append(true).open(&self.path)?;
        terminate_last_line(&mut file)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        for record in &accepted {
            writer.write_record(record.to_row())?;
        }
        writer.flush()?;

        match self.compact() {
            Ok(0) => {}
            Ok(removed) => collector_info!(
                "Removed {} historical duplicate(s) while persisting new rows",
                removed
            ),
            Err(err) => collector_warn!("Compaction after append failed: {}", err),
        }
        Ok(accepted.len())
    }

    /// Rewrites the store keeping the first row of each identity, in order.
    /// Returns the number of rows removed; the file is untouched when zero.
    /// Unreadable content leaves the file as it is.
    pub fn compact(&self) -> Result<usize, StoreError> {
        self.ensure_exists()?;
        let mut reader = self.reader()?;
        let headers = match reader.headers() {
            Ok(headers) => headers.clone(),
            Err(err) => {
                collector_warn!("Unreadable header in store {:?}, not compacting: {}", self.path, err);
                return Ok(0);
            }
        };
        let Some(link_idx) = headers.iter().position(|h| h.trim() == LINK_COLUMN) else {
            collector_warn!("Store {:?} has no {} column, not compacting", self.path, LINK_COLUMN);
            return Ok(0);
        };
        let projection: Vec<Option<usize>> = COLUMNS
            .iter()
            .map(|column| headers.iter().position(|h| h.trim() == *column))
            .collect();

        let mut seen = HashSet::new();
        let mut kept: Vec<Vec<String>> = Vec::new();
        let mut removed = 0;
        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(err) => {
                    collector_warn!("Unreadable row in store {:?}, not compacting: {}", self.path, err);
                    return Ok(0);
                }
            };
            if let Some(identity) = record.get(link_idx).and_then(Identity::from_link) {
                if !seen.insert(identity) {
                    removed += 1;
                    continue;
                }
            }
            kept.push(
                projection
                    .iter()
                    .map(|idx| idx.and_then(|i| record.get(i)).unwrap_or_default().to_string())
                    .collect(),
            );
        }

        if removed == 0 {
            return Ok(0);
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(COLUMNS)?;
        for row in &kept {
            writer.write_record(row)?;
        }
        let content = writer
            .into_inner()
            .map_err(|err| StoreError::Io(err.into_error()))?;
        replace_atomically(&self.path, &content)?;
        collector_debug!("Compacted {:?}: {} row(s) kept, {} removed", self.path, kept.len(), removed);
        Ok(removed)
    }

    /// Deletes the store and recreates an empty one with a fresh header.
    pub fn reset(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        self.ensure_exists()
    }

    fn reader(&self) -> Result<csv::Reader<fs::File>, csv::Error> {
        csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
    }
}

/// Writes a newline if the file's last byte is not one, so appended rows
/// start on their own line.
fn terminate_last_line(file: &mut fs::File) -> io::Result<()> {
    if file.metadata()?.len() == 0 {
        return Ok(());
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    if last[0] != b'\n' {
        file.write_all(b"\n")?;
    }
    Ok(())
}

fn column_index(reader: &mut csv::Reader<fs::File>, name: &str) -> Option<usize> {
    reader
        .headers()
        .ok()?
        .iter()
        .position(|header| header.trim() == name)
}

fn is_not_found(err: &csv::Error) -> bool {
    matches!(err.kind(), csv::ErrorKind::Io(io_err) if io_err.kind() == io::ErrorKind::NotFound)
}
