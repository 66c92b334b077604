//! Word tokenizer over Latin letters, digits and Hangul syllables.
//!
//! # Responsibility
//! - Strip markup tags, lowercase, split on non-word runs.
//! - Drop short tokens and stop words.
//!
//! # Invariants
//! - Tokens are at least 2 characters long.
//! - Tokenizing the space-joined output again yields the same set.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Characters that form words; everything else separates tokens.
pub const DEFAULT_WORD_CLASS: &str = "0-9A-Za-z가-힣";

const MIN_TOKEN_CHARS: usize = 2;

/// Stop words ignored when scoring related content.
pub const SIMILARITY_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "of", "to", "in", "is", "are", "for", "with", "this", "that",
    "있다", "없는", "한다", "하기", "대한", "그리고", "또는", "에서", "으로",
];

/// Stop words ignored when extracting quiz keywords.
pub const QUIZ_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "of", "to", "in", "is", "are", "it", "this", "that", "for",
    "with", "as", "on", "at", "by", "from", "we", "you", "i", "be", "can", "will", "not", "있다",
    "없는", "한다", "하기", "대한", "그리고", "또는", "에서", "으로", "하면", "합니다", "있어요",
    "정리",
];

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static DEFAULT_SPLIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("[^{DEFAULT_WORD_CLASS}]+")).expect("valid default split regex")
});

/// Tokenizer construction failures.
#[derive(Debug)]
pub enum TokenizerError {
    EmptyWordClass,
    InvalidWordClass { class: String, source: regex::Error },
}

impl Display for TokenizerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyWordClass => write!(f, "word class must not be empty"),
            Self::InvalidWordClass { class, source } => {
                write!(f, "invalid word class `{class}`: {source}")
            }
        }
    }
}

impl Error for TokenizerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyWordClass => None,
            Self::InvalidWordClass { source, .. } => Some(source),
        }
    }
}

/// Removes `<...>` spans. Text between tags is kept and joined as-is.
pub fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

/// Configured tokenizer: one word class plus one stop-word set.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    splitter: Regex,
    stop_words: HashSet<String>,
}

impl Tokenizer {
    /// Tokenizer used for related-content similarity.
    pub fn similarity() -> Self {
        Self::with_default_class(SIMILARITY_STOP_WORDS)
    }

    /// Tokenizer used for quiz keyword extraction.
    pub fn quiz() -> Self {
        Self::with_default_class(QUIZ_STOP_WORDS)
    }

    /// Builds a tokenizer for another locale's word characters.
    ///
    /// `word_class` is the body of a regex character class, e.g. `0-9A-Za-z`.
    ///
    /// # Errors
    /// - Returns an error when `word_class` is blank or does not compile.
    pub fn with_word_class<S: AsRef<str>>(
        word_class: &str,
        stop_words: &[S],
    ) -> Result<Self, TokenizerError> {
        if word_class.trim().is_empty() {
            return Err(TokenizerError::EmptyWordClass);
        }
        let splitter = Regex::new(&format!("[^{word_class}]+")).map_err(|source| {
            TokenizerError::InvalidWordClass {
                class: word_class.to_string(),
                source,
            }
        })?;
        Ok(Self {
            splitter,
            stop_words: collect_stop_words(stop_words),
        })
    }

    fn with_default_class(stop_words: &[&str]) -> Self {
        Self {
            splitter: DEFAULT_SPLIT_RE.clone(),
            stop_words: collect_stop_words(stop_words),
        }
    }

    /// Returns `true` when `token` is filtered as a stop word.
    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Ordered tokens in first-to-last source order, duplicates kept.
    pub fn token_list(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let plain = strip_tags(text).to_lowercase();
        self.splitter
            .split(&plain)
            .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
            .filter(|token| !self.stop_words.contains(*token))
            .map(str::to_string)
            .collect()
    }

    /// Normalized token set of `text`.
    pub fn tokenize(&self, text: &str) -> BTreeSet<String> {
        self.token_list(text).into_iter().collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::similarity()
    }
}

fn collect_stop_words<S: AsRef<str>>(stop_words: &[S]) -> HashSet<String> {
    stop_words
        .iter()
        .map(|word| word.as_ref().trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}
