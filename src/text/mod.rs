//! Line-break normalization and sentence splitting.
//!
//! Both steps key off the same set of sentence-ending characters, covering
//! Korean/English punctuation and the full-width East-Asian forms.

mod normalize;
mod splitter;

pub use normalize::{normalize_line_breaks, normalize_unicode};
pub use splitter::split_sentences;

/// Characters that end a sentence.
pub const TERMINALS: [char; 7] = ['.', '!', '?', '…', '。', '？', '！'];

/// Check if a character ends a sentence.
pub fn is_terminal(c: char) -> bool {
    TERMINALS.contains(&c)
}

/// Check if the text's last character ends a sentence.
///
/// Trailing whitespace is not skipped; callers pass trimmed text.
pub fn ends_with_terminal(text: &str) -> bool {
    text.chars().last().is_some_and(is_terminal)
}
