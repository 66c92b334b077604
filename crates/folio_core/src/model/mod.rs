//! Core domain models.
//!
//! # Responsibility
//! - Define read-only document projections shared by ranking and quiz code.
//! - Define quiz records and their construction invariants.
//!
//! # Invariants
//! - Each `Document` has exactly one canonical timestamp resolved by kind.
//! - Every persisted `QuizQuestion` passes `QuizQuestion::validate()`.

pub mod document;
pub mod link;
pub mod quiz;
