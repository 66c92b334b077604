//! Core domain logic for Folio.
//! Content similarity, category timelines and quiz generation over a
//! SQLite document store.

pub mod config;
pub mod db;
pub mod discover;
pub mod logging;
pub mod model;
pub mod quiz;
pub mod repo;
pub mod service;
pub mod text;

pub use config::{ConfigError, DiscoveryConfig, FolioConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use discover::{PathUrlResolver, UrlResolver};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status};
pub use model::document::{Category, Document, DocumentId, DocumentKind, DocumentValidationError};
pub use model::link::LinkItem;
pub use model::quiz::{Quiz, QuizId, QuizQuestion, QuizValidationError};
pub use quiz::{generate_quiz, NoShuffle, QuizGenerator, RngShuffle, Shuffle};
pub use repo::document_repo::{DocumentRepository, RecentQuery, SqliteDocumentRepository};
pub use repo::quiz_repo::{QuestionWrite, QuizRepository, SqliteQuizRepository};
pub use repo::{RepoError, RepoResult};
pub use service::discovery_service::{DetailView, DiscoveryService, SearchResults};
pub use service::document_service::{
    now_epoch_ms, CreatedDocument, DocumentEdit, DocumentService, NewDocument,
};
pub use service::quiz_service::{BackfillReport, QuizService, QuizSyncOutcome};
pub use service::{ServiceError, ServiceResult};
pub use text::{similarity, Tokenizer};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
