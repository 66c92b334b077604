//! Quiz domain model.
//!
//! # Responsibility
//! - Define the persisted quiz aggregate and its multiple-choice questions.
//! - Enforce question shape invariants at write and read boundaries.
//!
//! # Invariants
//! - At most one quiz exists per `(kind, document_id)`.
//! - `0 <= answer_index < choices.len()` and `choices.len() >= 2`.
//! - The choice at `answer_index` is never blank.

use crate::model::document::{DocumentId, DocumentKind};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage row id of a quiz.
pub type QuizId = i64;

/// Question shape violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizValidationError {
    EmptyPrompt,
    TooFewChoices(usize),
    AnswerOutOfRange { answer_index: usize, choices: usize },
    BlankAnswer(usize),
}

impl Display for QuizValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPrompt => write!(f, "question prompt must not be blank"),
            Self::TooFewChoices(count) => {
                write!(f, "question needs at least 2 choices, got {count}")
            }
            Self::AnswerOutOfRange {
                answer_index,
                choices,
            } => write!(
                f,
                "answer_index ({answer_index}) out of range for {choices} choices"
            ),
            Self::BlankAnswer(index) => write!(f, "answer choice at {index} is blank"),
        }
    }
}

impl Error for QuizValidationError {}

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub choices: Vec<String>,
    pub answer_index: usize,
}

impl QuizQuestion {
    /// Builds a question and checks its shape.
    pub fn try_new(
        prompt: impl Into<String>,
        choices: Vec<String>,
        answer_index: usize,
    ) -> Result<Self, QuizValidationError> {
        let question = Self {
            prompt: prompt.into(),
            choices,
            answer_index,
        };
        question.validate()?;
        Ok(question)
    }

    /// Checks question shape invariants.
    pub fn validate(&self) -> Result<(), QuizValidationError> {
        if self.prompt.trim().is_empty() {
            return Err(QuizValidationError::EmptyPrompt);
        }
        if self.choices.len() < 2 {
            return Err(QuizValidationError::TooFewChoices(self.choices.len()));
        }
        let Some(answer) = self.choices.get(self.answer_index) else {
            return Err(QuizValidationError::AnswerOutOfRange {
                answer_index: self.answer_index,
                choices: self.choices.len(),
            });
        };
        if answer.trim().is_empty() {
            return Err(QuizValidationError::BlankAnswer(self.answer_index));
        }
        Ok(())
    }

    /// The correct choice text.
    pub fn answer(&self) -> &str {
        self.choices
            .get(self.answer_index)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Quiz attached to exactly one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: QuizId,
    pub kind: DocumentKind,
    pub document_id: DocumentId,
    /// Mirrors the document title at generation time.
    pub title: String,
    /// Ordered questions; empty until generation ran.
    pub questions: Vec<QuizQuestion>,
}

#[cfg(test)]
mod tests {
    use super::{QuizQuestion, QuizValidationError};

    fn choices(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn try_new_accepts_well_formed_question() {
        let question = QuizQuestion::try_new("pick", choices(&["a", "b"]), 1).unwrap();
        assert_eq!(question.answer(), "b");
    }

    #[test]
    fn validate_rejects_out_of_range_answer() {
        let err = QuizQuestion::try_new("pick", choices(&["a", "b"]), 2).unwrap_err();
        assert_eq!(
            err,
            QuizValidationError::AnswerOutOfRange {
                answer_index: 2,
                choices: 2
            }
        );
    }

    #[test]
    fn validate_rejects_single_choice_and_blank_answer() {
        assert_eq!(
            QuizQuestion::try_new("pick", choices(&["a"]), 0).unwrap_err(),
            QuizValidationError::TooFewChoices(1)
        );
        assert_eq!(
            QuizQuestion::try_new("pick", choices(&["a", "  "]), 1).unwrap_err(),
            QuizValidationError::BlankAnswer(1)
        );
        assert_eq!(
            QuizQuestion::try_new(" ", choices(&["a", "b"]), 0).unwrap_err(),
            QuizValidationError::EmptyPrompt
        );
    }
}
