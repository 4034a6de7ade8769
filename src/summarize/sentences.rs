// src/summarize/sentences.rs
//! Sentence segmentation used by every heuristic strategy.

/// Collapse whitespace runs (newlines included) into single spaces and trim.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split text into ordered sentences.
///
/// A boundary is `.`, `!` or `?` immediately followed by whitespace. The text is
/// whitespace-normalized first, so fragments never carry leading/trailing spaces.
/// Text without terminal punctuation comes back as a single sentence; empty or
/// whitespace-only text yields no sentences at all.
pub fn split_sentences(text: &str) -> Vec<String> {
    let cleaned = normalize_whitespace(text);
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut prev_terminal = false;

    for (idx, ch) in cleaned.char_indices() {
        if ch == ' ' && prev_terminal {
            push_fragment(&mut out, &cleaned[start..idx]);
            start = idx + 1;
        }
        prev_terminal = matches!(ch, '.' | '!' | '?');
    }
    push_fragment(&mut out, &cleaned[start..]);

    out
}

fn push_fragment(out: &mut Vec<String>, fragment: &str) {
    if !fragment.is_empty() {
        out.push(fragment.to_string());
    }
}
