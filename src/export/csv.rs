//! Combined CSV output.
//!
//! UTF-8 with a byte order mark so spreadsheet applications pick the right
//! encoding, `\r\n` record separators, and fields quoted only when they
//! contain a comma, quote or line break.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::SentenceRecord;

use super::write_file;

/// Name of the combined CSV file.
pub const CSV_FILE_NAME: &str = "all_sentences.csv";

const BOM: &str = "\u{FEFF}";
const HEADER: &str = "page_num,sentence";

/// Render records as CSV, including the BOM and header row.
pub fn to_csv(records: &[SentenceRecord]) -> String {
    let mut out = String::with_capacity(BOM.len() + HEADER.len() + records.len() * 64);
    out.push_str(BOM);
    out.push_str(HEADER);
    out.push_str("\r\n");

    for record in records {
        out.push_str(&record.start_page.to_string());
        out.push(',');
        out.push_str(&escape_field(&record.sentence));
        out.push_str("\r\n");
    }

    out
}

/// Write `all_sentences.csv` into `dir`.
pub fn write_csv(records: &[SentenceRecord], dir: &Path) -> Result<PathBuf> {
    let path = dir.join(CSV_FILE_NAME);
    write_file(&path, to_csv(records))?;
    Ok(path)
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain text."), "plain text.");
        assert_eq!(escape_field("a, b"), "\"a, b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_to_csv_layout() {
        let records = vec![
            SentenceRecord::new(5, "첫 문장입니다."),
            SentenceRecord::new(6, "Yes, really."),
        ];
        let csv = to_csv(&records);
        assert!(csv.starts_with('\u{FEFF}'));
        assert_eq!(
            csv.trim_start_matches('\u{FEFF}'),
            "page_num,sentence\r\n5,첫 문장입니다.\r\n6,\"Yes, really.\"\r\n"
        );
    }
}
