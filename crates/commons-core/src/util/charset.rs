//! Charset detection.

use chardetng::EncodingDetector;
use commons_types::Result;
use encoding_rs::{Encoding, UTF_8};
use std::fs;
use std::path::Path;

/// Name reported for pure 7-bit content.
pub const US_ASCII: &str = "US-ASCII";

/// Best-effort charset of a file.
///
/// Returns `None` when the file is empty or the statistical guess is not
/// confident. Names are encoding labels that `read_props` accepts.
pub fn detect_charset(file: impl AsRef<Path>) -> Result<Option<String>> {
    let bytes = fs::read(file.as_ref())?;
    Ok(detect_bytes(&bytes).map(str::to_string))
}

/// Best-effort charset of raw bytes.
pub fn detect_bytes(bytes: &[u8]) -> Option<&'static str> {
    if bytes.is_empty() {
        return None;
    }
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return Some(encoding.name());
    }
    if bytes.is_ascii() {
        return Some(US_ASCII);
    }
    if std::str::from_utf8(bytes).is_ok() {
        return Some(UTF_8.name());
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let (encoding, confident) = detector.guess_assess(None, false);
    if confident {
        Some(encoding.name())
    } else {
        tracing::debug!(guess = encoding.name(), "Charset guess is not confident");
        None
    }
}
