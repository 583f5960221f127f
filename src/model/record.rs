//! Output records.

use serde::{Deserialize, Serialize};

/// A finished sentence tagged with the page it started on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRecord {
    /// Page on which the sentence's first character occurred (1-indexed)
    #[serde(rename = "page_num")]
    pub start_page: u32,

    /// Sentence text, trimmed
    pub sentence: String,
}

impl SentenceRecord {
    pub fn new(start_page: u32, sentence: impl Into<String>) -> Self {
        Self {
            start_page,
            sentence: sentence.into(),
        }
    }
}
