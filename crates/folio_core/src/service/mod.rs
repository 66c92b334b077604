//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and pure discovery/quiz functions.
//! - Keep callers decoupled from storage details.

use crate::model::document::{DocumentId, DocumentKind, DocumentValidationError};
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod discovery_service;
pub mod document_service;
pub mod quiz_service;

/// Service error for discovery, document and quiz use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Target document does not exist (or has another kind).
    DocumentNotFound { kind: DocumentKind, id: DocumentId },
    /// Caller input fails document invariants.
    InvalidDocument(DocumentValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentNotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::InvalidDocument(err) => write!(f, "invalid document: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDocument(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::InvalidDocument(err),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
