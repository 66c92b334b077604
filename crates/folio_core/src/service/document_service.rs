//! Document authoring use-cases.
//!
//! # Responsibility
//! - Validate and persist new documents with their categories.
//! - Guarantee a quiz exists right after a document is created.
//!
//! # Invariants
//! - A document and its categories are stored in one transaction, before
//!   the quiz is generated, so the category question sees them.
//! - The returned document is the persisted read-back, not the input.

use crate::model::document::{Document, DocumentId, DocumentKind};
use crate::quiz::Shuffle;
use crate::repo::document_repo::DocumentRepository;
use crate::repo::quiz_repo::QuizRepository;
use crate::service::quiz_service::{QuizService, QuizSyncOutcome};
use crate::service::{ServiceError, ServiceResult};
use log::info;
use std::time::{SystemTime, UNIX_EPOCH};

/// Input for [`DocumentService::create_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub kind: DocumentKind,
    pub title: String,
    pub body: String,
    /// Category display names; blanks and duplicates are dropped.
    pub categories: Vec<String>,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

impl NewDocument {
    /// Builds an uncategorized document stamped with the current time.
    pub fn now(kind: DocumentKind, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
            categories: Vec::new(),
            created_at: now_epoch_ms(),
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }
}

/// Full replacement of a document's editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEdit {
    pub title: String,
    pub body: String,
    /// `None` keeps the current categories.
    pub categories: Option<Vec<String>>,
    /// Edit time in epoch milliseconds.
    pub updated_at: i64,
}

/// Persisted document plus what its quiz bootstrap did.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedDocument {
    pub document: Document,
    pub quiz: QuizSyncOutcome,
}

/// Document service facade.
pub struct DocumentService<D, Q, S> {
    documents: D,
    quizzes: QuizService<D, Q, S>,
}

impl<D, Q, S> DocumentService<D, Q, S>
where
    D: DocumentRepository + Clone,
    Q: QuizRepository,
    S: Shuffle,
{
    /// Creates a service sharing `documents` with its quiz service.
    pub fn new(documents: D, quizzes: Q, rng: S) -> Self {
        let quiz_service = QuizService::new(documents.clone(), quizzes, rng);
        Self::with_quiz_service(documents, quiz_service)
    }

    pub fn with_quiz_service(documents: D, quizzes: QuizService<D, Q, S>) -> Self {
        Self { documents, quizzes }
    }

    /// Persists one document, attaches categories and ensures its quiz.
    pub fn create_document(&mut self, input: NewDocument) -> ServiceResult<CreatedDocument> {
        let document = Document::new(input.kind, input.title, input.body, input.created_at);
        document.validate().map_err(ServiceError::InvalidDocument)?;

        let id = self
            .documents
            .create_document(&document, &input.categories)?;

        let document = self
            .documents
            .get_document(id)?
            .ok_or(ServiceError::InconsistentState(
                "created document not found in read-back",
            ))?;
        let quiz = self.quizzes.ensure_quiz_exists(&document)?;

        info!(
            "event=document_create module=document status=ok kind={} id={} categories={} questions={}",
            document.kind,
            document.id,
            document.category_tags.len(),
            quiz.questions_created
        );
        Ok(CreatedDocument { document, quiz })
    }

    /// Rewrites one document and ensures its quiz.
    ///
    /// Existing questions are kept; run a forced regeneration to refresh them.
    pub fn update_document(
        &mut self,
        kind: DocumentKind,
        id: DocumentId,
        edit: DocumentEdit,
    ) -> ServiceResult<CreatedDocument> {
        let mut document = self
            .documents
            .get_document(id)?
            .filter(|document| document.kind == kind)
            .ok_or(ServiceError::DocumentNotFound { kind, id })?;
        document.title = edit.title;
        document.body = edit.body;
        document.updated_at = edit.updated_at;
        document.validate().map_err(ServiceError::InvalidDocument)?;

        self.documents
            .update_document(&document, edit.categories.as_deref())?;

        let document = self
            .documents
            .get_document(id)?
            .ok_or(ServiceError::InconsistentState(
                "updated document not found in read-back",
            ))?;
        let quiz = self.quizzes.ensure_quiz_exists(&document)?;

        info!(
            "event=document_update module=document status=ok kind={} id={} categories={} questions={}",
            document.kind,
            document.id,
            document.category_tags.len(),
            quiz.questions_created
        );
        Ok(CreatedDocument { document, quiz })
    }

    /// Quiz service sharing this service's repositories.
    pub fn quizzes(&mut self) -> &mut QuizService<D, Q, S> {
        &mut self.quizzes
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
