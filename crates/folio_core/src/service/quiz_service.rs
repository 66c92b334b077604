//! Quiz lifecycle use-cases.
//!
//! # Responsibility
//! - Create the document's quiz on first need (`ensure_quiz_exists`).
//! - Force-regenerate one quiz, or backfill every document in bulk.
//!
//! # Invariants
//! - Non-forced runs never touch a quiz that already has questions.
//! - Forced runs swap the whole question set in one transaction.
//! - A quiz never holds more than one generated question set.
//! - Randomness comes only from the injected shuffle source.

use crate::model::document::{Document, DocumentId, DocumentKind};
use crate::model::quiz::Quiz;
use crate::quiz::{QuizGenerator, Shuffle};
use crate::repo::document_repo::DocumentRepository;
use crate::repo::quiz_repo::QuizRepository;
use crate::service::ServiceResult;
use log::{debug, info};
use serde::Serialize;
use std::time::Instant;

/// What one ensure/regenerate call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuizSyncOutcome {
    pub quiz_created: bool,
    pub title_updated: bool,
    pub questions_deleted: usize,
    pub questions_created: usize,
}

impl QuizSyncOutcome {
    /// `true` when the call left storage untouched.
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Totals of one bulk backfill run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    pub documents_scanned: usize,
    pub quizzes_created: usize,
    pub quizzes_updated: usize,
    pub questions_deleted: usize,
    pub questions_created: usize,
}

impl BackfillReport {
    fn record(&mut self, outcome: QuizSyncOutcome) {
        self.documents_scanned += 1;
        self.quizzes_created += usize::from(outcome.quiz_created);
        self.quizzes_updated += usize::from(outcome.title_updated);
        self.questions_deleted += outcome.questions_deleted;
        self.questions_created += outcome.questions_created;
    }
}

/// Quiz service facade over document and quiz repositories.
pub struct QuizService<D, Q, S> {
    documents: D,
    quizzes: Q,
    generator: QuizGenerator,
    rng: S,
}

impl<D, Q, S> QuizService<D, Q, S>
where
    D: DocumentRepository,
    Q: QuizRepository,
    S: Shuffle,
{
    /// Creates a service with the default quiz generator.
    pub fn new(documents: D, quizzes: Q, rng: S) -> Self {
        Self::with_generator(documents, quizzes, QuizGenerator::default(), rng)
    }

    pub fn with_generator(documents: D, quizzes: Q, generator: QuizGenerator, rng: S) -> Self {
        Self {
            documents,
            quizzes,
            generator,
            rng,
        }
    }

    /// Creates and fills the document's quiz unless it already has questions.
    pub fn ensure_quiz_exists(&mut self, document: &Document) -> ServiceResult<QuizSyncOutcome> {
        let (quiz, created) =
            self.quizzes
                .get_or_create_quiz(document.kind, document.id, &document.title)?;
        self.fill(document, &quiz, created, false)
    }

    /// Deletes the document's questions and generates a fresh set.
    pub fn regenerate(&mut self, document: &Document) -> ServiceResult<QuizSyncOutcome> {
        let (quiz, created) =
            self.quizzes
                .get_or_create_quiz(document.kind, document.id, &document.title)?;
        self.fill(document, &quiz, created, true)
    }

    /// Walks every post, then every note, ensuring (or with `force`,
    /// regenerating) each quiz. Existing quiz titles follow document titles.
    pub fn backfill(&mut self, force: bool) -> ServiceResult<BackfillReport> {
        let started_at = Instant::now();
        info!("event=quiz_backfill module=quiz status=start force={force}");

        let mut report = BackfillReport::default();
        for kind in [DocumentKind::Post, DocumentKind::Note] {
            for document in self.documents.list_documents(kind)? {
                let (quiz, created) =
                    self.quizzes
                        .get_or_create_quiz(document.kind, document.id, &document.title)?;
                let title_updated = !created && quiz.title != document.title;
                if title_updated {
                    self.quizzes.update_quiz_title(quiz.id, &document.title)?;
                }

                let mut outcome = self.fill(&document, &quiz, created, force)?;
                outcome.title_updated = title_updated;
                report.record(outcome);
            }
        }

        info!(
            "event=quiz_backfill module=quiz status=ok force={} duration_ms={} documents={} quizzes_created={} quizzes_updated={} questions_deleted={} questions_created={}",
            force,
            started_at.elapsed().as_millis(),
            report.documents_scanned,
            report.quizzes_created,
            report.quizzes_updated,
            report.questions_deleted,
            report.questions_created
        );
        Ok(report)
    }

    /// Loads the stored quiz of one document.
    pub fn quiz_for(&self, kind: DocumentKind, id: DocumentId) -> ServiceResult<Option<Quiz>> {
        Ok(self.quizzes.find_quiz(kind, id)?)
    }

    fn fill(
        &mut self,
        document: &Document,
        quiz: &Quiz,
        created: bool,
        force: bool,
    ) -> ServiceResult<QuizSyncOutcome> {
        let mut outcome = QuizSyncOutcome {
            quiz_created: created,
            ..QuizSyncOutcome::default()
        };

        if !created && !force && !quiz.questions.is_empty() {
            debug!(
                "event=quiz_ensure module=quiz status=skipped kind={} id={} questions={}",
                document.kind,
                document.id,
                quiz.questions.len()
            );
            return Ok(outcome);
        }

        let categories = self.documents.category_names(document.id)?;
        let questions =
            self.generator
                .generate(&document.title, &document.body, &categories, &mut self.rng);
        let write = self.quizzes.replace_questions(quiz.id, &questions, force)?;
        if write.skipped {
            debug!(
                "event=quiz_ensure module=quiz status=skipped kind={} id={} reason=filled_concurrently",
                document.kind, document.id
            );
            return Ok(outcome);
        }
        outcome.questions_deleted = write.deleted;
        outcome.questions_created = write.inserted;

        info!(
            "event=quiz_ensure module=quiz status=ok kind={} id={} force={} created={} deleted={} inserted={}",
            document.kind,
            document.id,
            force,
            created,
            outcome.questions_deleted,
            outcome.questions_created
        );
        Ok(outcome)
    }
}
