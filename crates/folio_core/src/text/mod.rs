//! Text normalization primitives.
//!
//! # Responsibility
//! - Turn markup-bearing text into normalized token sets and sentences.
//! - Score token-set overlap for related-content ranking.
//!
//! # Invariants
//! - Every function here is total: empty input yields empty output.
//! - Similarity and quiz tokenization keep separate stop-word sets.

pub mod sentences;
pub mod similarity;
pub mod tokenize;

pub use sentences::{split_sentences, truncate_choice, MAX_CHOICE_CHARS, MIN_SENTENCE_CHARS};
pub use similarity::similarity;
pub use tokenize::{
    strip_tags, Tokenizer, TokenizerError, DEFAULT_WORD_CLASS, QUIZ_STOP_WORDS,
    SIMILARITY_STOP_WORDS,
};
