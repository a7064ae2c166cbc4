use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMarkup {
    pub text: String,
    pub encoding: &'static str,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("body is not valid {encoding}")]
    Malformed { encoding: &'static str },
}

/// Decodes a response body to UTF-8.
///
/// Order of evidence: byte-order mark, then the `charset` parameter of the
/// Content-Type header, then chardetng sniffing. Empty bodies decode as UTF-8.
pub fn decode_markup(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedMarkup, DecodeError> {
    if bytes.is_empty() {
        return Ok(DecodedMarkup {
            text: String::new(),
            encoding: UTF_8.name(),
        });
    }

    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(charset_param)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::Malformed {
            encoding: used.name(),
        });
    }
    Ok(DecodedMarkup {
        text: text.into_owned(),
        encoding: used.name(),
    })
}

fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']))
    })
}
