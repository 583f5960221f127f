//! Joining line-wrapped PDF text back into prose.

use unicode_normalization::UnicodeNormalization;

use super::ends_with_terminal;

/// Join wrapped lines into prose, keeping a newline only after lines that
/// end a sentence.
///
/// Lines are trimmed and blank lines dropped. A line ending in `-` is glued
/// to the next line without the hyphen; a line without terminal punctuation
/// is followed by a single space; a terminated line is followed by `\n`.
///
/// # Example
///
/// ```
/// use pagesent::text::normalize_line_breaks;
///
/// assert_eq!(
///     normalize_line_breaks("Line one-\nLine two."),
///     "Line oneLine two.\n"
/// );
/// ```
pub fn normalize_line_breaks(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());

    for line in raw.split(is_line_boundary) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(stem) = line.strip_suffix('-') {
            normalized.push_str(stem);
        } else if ends_with_terminal(line) {
            normalized.push_str(line);
            normalized.push('\n');
        } else {
            normalized.push_str(line);
            normalized.push(' ');
        }
    }

    normalized
}

/// Apply Unicode NFC normalization.
///
/// Decomposed Hangul jamo and combining accents coming out of some PDF
/// producers otherwise break caption matching and text-length checks.
pub fn normalize_unicode(text: &str) -> String {
    text.nfc().collect()
}

/// Line separators recognised in extracted text.
///
/// Besides `\n` and `\r` this includes form feed (page breaks in some text
/// layers) and the Unicode line/paragraph separators.
fn is_line_boundary(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0B}'
            | '\u{0C}'
            | '\u{1C}'
            | '\u{1D}'
            | '\u{1E}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}
