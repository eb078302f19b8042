//! Splits JSON text into structural delimiters and the runs between them.

use crate::util::merge_quoted;

/// Tested in this order at every offset; the first match wins.
pub const DELIMITERS: [char; 6] = ['[', ']', ',', ':', '{', '}'];

/// Cut `text` at every delimiter, keeping each delimiter as its own token.
fn split(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut start = 0;
    for (pos, ch) in text.char_indices() {
        if DELIMITERS.contains(&ch) {
            if start != pos {
                tokens.push(text[start..pos].to_string());
            }
            tokens.push(ch.to_string());
            start = pos + ch.len_utf8();
        }
    }
    if start != text.len() {
        tokens.push(text[start..].to_string());
    }
    tokens
}

pub fn tokenize(text: &str) -> Vec<String> {
    let raw = split(text);
    let raw_len = raw.len();
    let merged = merge_quoted(raw);
    if merged.len() != raw_len {
        log::debug!(
            "rejoined {} tokens split inside string literals",
            raw_len - merged.len()
        );
    }
    merged
        .into_iter()
        .filter_map(|token| {
            let trimmed = token.trim();
            if trimmed.is_empty() {
                None
            } else if trimmed.len() == token.len() {
                Some(token)
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}
