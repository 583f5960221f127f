//! Writing sentence records to disk.
//!
//! Three layouts are supported: one text file per sentence, a combined CSV
//! file and a combined JSON file. The combined layouts also write the
//! per-sentence files.

mod csv;
mod individual;
mod json;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::model::SentenceRecord;

pub use self::csv::{to_csv, write_csv, CSV_FILE_NAME};
pub use individual::{individual_file_name, write_individual};
pub use json::{to_json, write_json, JsonFormat, JSON_FILE_NAME};

/// Output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One `.txt` file per sentence
    #[default]
    Individual,
    /// Per-sentence files plus `all_sentences.csv`
    Csv,
    /// Per-sentence files plus `all_sentences.json`
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Individual => "individual",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "individual" | "txt" => Ok(OutputFormat::Individual),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paths written by an export run.
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Directory everything was written into
    pub dir: PathBuf,
    /// Per-sentence text files, in record order
    pub sentence_files: Vec<PathBuf>,
    /// Combined CSV or JSON file, if one was written
    pub combined_file: Option<PathBuf>,
}

impl ExportSummary {
    /// Total number of files written.
    pub fn file_count(&self) -> usize {
        self.sentence_files.len() + usize::from(self.combined_file.is_some())
    }
}

/// Write `records` into `dir` using `format`, creating the directory first.
///
/// Combined files are not written when there are no records.
pub fn export<P: AsRef<Path>>(
    records: &[SentenceRecord],
    dir: P,
    format: OutputFormat,
) -> Result<ExportSummary> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| export_error(dir, e))?;

    let sentence_files = write_individual(records, dir)?;

    let combined_file = match format {
        _ if records.is_empty() => None,
        OutputFormat::Individual => None,
        OutputFormat::Csv => Some(write_csv(records, dir)?),
        OutputFormat::Json => Some(write_json(records, dir, JsonFormat::Pretty)?),
    };

    log::info!(
        "Exported {} sentences to {}",
        records.len(),
        dir.display()
    );

    Ok(ExportSummary {
        dir: dir.to_path_buf(),
        sentence_files,
        combined_file,
    })
}

fn export_error(path: &Path, err: impl std::fmt::Display) -> Error {
    Error::Export {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Write a whole file, reporting failures against its path.
fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    fs::write(path, contents).map_err(|e| export_error(path, e))
}
