//! Sentence splitting and choice truncation for quiz options.

use crate::text::tokenize::strip_tags;
use once_cell::sync::Lazy;
use regex::Regex;

/// Sentences shorter than this (after trimming) are ignored.
pub const MIN_SENTENCE_CHARS: usize = 12;
/// Quiz choices longer than this are cut and marked with `…`.
pub const MAX_CHOICE_CHARS: usize = 120;

const ELLIPSIS: char = '…';

static SENTENCE_BOUNDARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:[.!?]\s+|\n+)").expect("valid sentence boundary regex"));

/// Splits markup-free text at `.`/`!`/`?` plus whitespace, or at newlines.
///
/// Segments are trimmed; those shorter than [`MIN_SENTENCE_CHARS`] are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let plain = strip_tags(text);
    SENTENCE_BOUNDARY_RE
        .split(&plain)
        .map(str::trim)
        .filter(|part| part.chars().count() >= MIN_SENTENCE_CHARS)
        .map(str::to_string)
        .collect()
}

/// Cuts `text` to [`MAX_CHOICE_CHARS`] characters, appending `…` when cut.
pub fn truncate_choice(text: &str) -> String {
    if text.chars().count() <= MAX_CHOICE_CHARS {
        return text.to_string();
    }
    let mut truncated = text.chars().take(MAX_CHOICE_CHARS).collect::<String>();
    truncated.push(ELLIPSIS);
    truncated
}

#[cfg(test)]
mod tests {
    use super::{split_sentences, truncate_choice, MAX_CHOICE_CHARS};

    #[test]
    fn split_sentences_uses_punctuation_and_newlines() {
        let sentences = split_sentences(
            "Django ORM makes queries easy. Django ORM can also be slow.\nShort one\n\nIs caching worth it? Yes",
        );
        assert_eq!(
            sentences,
            vec![
                "Django ORM makes queries easy",
                "Django ORM can also be slow",
                "Is caching worth it",
            ]
        );
    }

    #[test]
    fn split_sentences_strips_markup() {
        let sentences = split_sentences("<p>Ownership moves values.</p> <p>Borrowing lends them</p>");
        assert_eq!(sentences, vec!["Ownership moves values", "Borrowing lends them"]);
    }

    #[test]
    fn truncate_choice_marks_cut_text() {
        let short = "a".repeat(MAX_CHOICE_CHARS);
        assert_eq!(truncate_choice(&short), short);

        let long = "가".repeat(MAX_CHOICE_CHARS + 5);
        let cut = truncate_choice(&long);
        assert_eq!(cut.chars().count(), MAX_CHOICE_CHARS + 1);
        assert!(cut.ends_with('…'));
    }
}
