//! Combined JSON output.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::SentenceRecord;

use super::write_file;

/// Name of the combined JSON file.
pub const JSON_FILE_NAME: &str = "all_sentences.json";

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize records as an array of `{"page_num", "sentence"}` objects.
///
/// Non-ASCII text is written as-is, not escaped.
pub fn to_json(records: &[SentenceRecord], format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(records),
        JsonFormat::Compact => serde_json::to_string(records),
    };

    result.map_err(|e| Error::Export {
        path: PathBuf::from(JSON_FILE_NAME),
        message: format!("JSON serialization error: {}", e),
    })
}

/// Write `all_sentences.json` into `dir`.
pub fn write_json(records: &[SentenceRecord], dir: &Path, format: JsonFormat) -> Result<PathBuf> {
    let path = dir.join(JSON_FILE_NAME);
    write_file(&path, to_json(records, format)?)?;
    Ok(path)
}
