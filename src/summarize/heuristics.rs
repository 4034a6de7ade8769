// src/summarize/heuristics.rs
//! Deterministic, extractive summaries. These are the guaranteed fallback when no
//! backend is requested or the requested one misses.

use once_cell::sync::OnceCell;
use regex::Regex;

use super::sentences::split_sentences;

/// Case-insensitive substrings that mark a line as an action item.
pub const ACTION_KEYWORDS: [&str; 7] = [
    "todo", "to do", "action", "deadline", "due", "请办理", "待办",
];

/// First `max_sentences` sentences of `text`.
///
/// Short input (sentence count <= `max_sentences`) is returned verbatim, original
/// whitespace included. Longer input comes back as the normalized sentences
/// joined by single spaces.
pub fn summarize_general(text: &str, max_sentences: usize) -> String {
    let sentences = split_sentences(text);
    if sentences.len() <= max_sentences {
        return text.to_string();
    }
    sentences[..max_sentences].join(" ")
}

/// Overview plus any lines that look like action items.
pub fn summarize_email(text: &str, max_sentences: usize) -> String {
    let overview = summarize_general(text, max_sentences);
    let actions = action_lines(text);
    if actions.is_empty() {
        return overview;
    }
    let bullets = actions
        .iter()
        .map(|a| format!("- {a}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{overview}\n\nAction items:\n{bullets}")
}

/// Line boundaries recognized in mail bodies: `\n`, lone `\r`, and the Unicode
/// separators (`\u{85}`, `\u{2028}`, `\u{2029}`, vertical tab, form feed, `\x1c`..`\x1e`).
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Trimmed lines containing one of [`ACTION_KEYWORDS`], in original order.
pub fn action_lines(text: &str) -> Vec<String> {
    text.split(is_line_break)
        .filter(|line| {
            let lower = line.to_lowercase();
            ACTION_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Summarize each blank-line-delimited section separately, labelled `Section N`.
pub fn summarize_report(text: &str, max_sentences_per_section: usize) -> String {
    split_sections(text)
        .iter()
        .enumerate()
        .map(|(idx, section)| {
            format!(
                "Section {}: {}",
                idx + 1,
                summarize_general(section, max_sentences_per_section)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Split on runs of two or more `\n`, trimming and dropping empty sections.
pub fn split_sections(text: &str) -> Vec<&str> {
    static RE_BLANK: OnceCell<Regex> = OnceCell::new();
    let re = RE_BLANK.get_or_init(|| Regex::new(r"\n{2,}").expect("section regex"));
    re.split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_keeps_short_text_verbatim() {
        let text = "  One sentence.\n   Two sentences.  ";
        assert_eq!(summarize_general(text, 2), text);
        assert_eq!(summarize_general(text, 5), text);
    }

    #[test]
    fn general_truncates_long_text_to_normalized_sentences() {
        let text = "First.\nSecond!   Third? Fourth.";
        assert_eq!(summarize_general(text, 2), "First. Second!");
    }

    #[test]
    fn general_with_zero_budget_and_empty_text() {
        assert_eq!(summarize_general("", 0), "");
        assert_eq!(summarize_general("Only one.", 0), "");
    }

    #[test]
    fn email_without_action_lines_is_just_the_overview() {
        let text = "Hello team. Lunch is at noon. Bring snacks.";
        assert_eq!(summarize_email(text, 2), "Hello team. Lunch is at noon.");
    }

    #[test]
    fn email_lists_action_lines_in_order() {
        let text = "Status update.\n  Action: review the PR  \nThe deadline is Monday.\nThanks";
        let out = summarize_email(text, 1);
        assert_eq!(
            out,
            "Status update.\n\nAction items:\n- Action: review the PR\n- The deadline is Monday."
        );
    }

    #[test]
    fn email_matches_keywords_case_insensitively_and_in_chinese() {
        let lines = action_lines("TO DO list\n请办理报销\nnothing here\n待办：周报");
        assert_eq!(lines, vec!["TO DO list", "请办理报销", "待办：周报"]);
    }

    #[test]
    fn email_lines_split_on_carriage_returns_and_unicode_separators() {
        assert_eq!(
            summarize_email("Hi.\rTODO: x.\rBye.", 5),
            "Hi.\rTODO: x.\rBye.\n\nAction items:\n- TODO: x."
        );
        let lines = action_lines("Due Friday.\r\nnoise\u{2028}action: ship it");
        assert_eq!(lines, vec!["Due Friday.", "action: ship it"]);
    }

    #[test]
    fn report_sections_are_labelled_from_one() {
        let out = summarize_report("Intro.\n\n\nBody one. Body two. Body three.", 2);
        assert_eq!(out, "Section 1: Intro.\n\nSection 2: Body one. Body two.");
    }

    #[test]
    fn report_without_blank_lines_is_one_section() {
        let out = summarize_report("Line one.\nLine two.", 2);
        assert_eq!(out, "Section 1: Line one.\nLine two.");
    }

    #[test]
    fn sections_ignore_whitespace_only_blocks() {
        let s = split_sections("\n\nA\n\n   \n\nB\n");
        assert_eq!(s, vec!["A", "B"]);
    }
}
