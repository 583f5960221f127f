//! Punctuation-based sentence splitting.

use super::is_terminal;

/// Split prose into sentences.
///
/// A boundary is any run of whitespace directly preceded by a terminal
/// character. Pieces are trimmed and empty pieces dropped. There is no
/// abbreviation or quote handling: `"e.g. this"` splits after `e.g.`.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut in_gap = false;

    for (idx, c) in text.char_indices() {
        if in_gap {
            if c.is_whitespace() {
                continue;
            }
            in_gap = false;
            start = idx;
        } else if c.is_whitespace() && prev.is_some_and(is_terminal) {
            push_trimmed(&mut sentences, &text[start..idx]);
            in_gap = true;
        }
        prev = Some(c);
    }

    if !in_gap {
        push_trimmed(&mut sentences, &text[start..]);
    }

    sentences
}

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        out.push(piece.to_string());
    }
}
