//! One text file per sentence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::SentenceRecord;

use super::write_file;

/// File name for the `index`-th sentence (1-based) starting on `page`.
///
/// ```
/// assert_eq!(pagesent::export::individual_file_name(5, 12), "page_005_0012.txt");
/// ```
pub fn individual_file_name(page: u32, index: u32) -> String {
    format!("page_{:03}_{:04}.txt", page, index)
}

/// Write each sentence to its own file in `dir`.
///
/// The index in the file name counts sentences per start page, in record
/// order. Returns the written paths in the same order as `records`.
pub fn write_individual(records: &[SentenceRecord], dir: &Path) -> Result<Vec<PathBuf>> {
    let mut counters: HashMap<u32, u32> = HashMap::new();
    let mut written = Vec::with_capacity(records.len());

    for record in records {
        let index = counters.entry(record.start_page).or_insert(0);
        *index += 1;

        let path = dir.join(individual_file_name(record.start_page, *index));
        write_file(&path, &record.sentence)?;
        written.push(path);
    }

    log::debug!("Wrote {} sentence files", written.len());
    Ok(written)
}
