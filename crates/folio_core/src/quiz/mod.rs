//! Multiple-choice quiz generation.
//!
//! # Responsibility
//! - Derive up to five questions from a document's title, body and categories.
//! - Take randomness from an injected shuffle source only.
//!
//! # Invariants
//! - Generation never fails; unusable input yields fewer questions.
//! - Every generated question passes `QuizQuestion::validate()`.

pub mod generator;
pub mod shuffle;

pub use generator::{generate_quiz, QuizGenerator, FALLBACK_CATEGORY, MAX_QUESTIONS};
pub use shuffle::{NoShuffle, RngShuffle, Shuffle};
