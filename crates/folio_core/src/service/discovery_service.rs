//! Detail-page discovery use-cases.
//!
//! # Responsibility
//! - Fetch bounded candidate snapshots once per render.
//! - Feed them to the pure ranking/timeline functions.
//! - Serve the cross-kind recent list and title search.
//!
//! # Invariants
//! - Candidate pools are capped at `candidate_window` per kind.
//! - Pools are ordered focal kind first, then the other kind.

use crate::config::{ConfigError, DiscoveryConfig, FolioConfig};
use crate::discover::{
    build_timeline, rank_related, recent_items, PathUrlResolver, UrlResolver,
};
use crate::model::document::{Document, DocumentId, DocumentKind};
use crate::model::link::LinkItem;
use crate::model::quiz::Quiz;
use crate::repo::document_repo::{DocumentRepository, RecentQuery};
use crate::repo::quiz_repo::QuizRepository;
use crate::service::{ServiceError, ServiceResult};
use crate::text::Tokenizer;
use log::debug;
use std::time::Instant;

/// Everything a detail page renders besides the document itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub document: Document,
    pub related: Vec<LinkItem>,
    pub timeline: Vec<LinkItem>,
    pub quiz: Option<Quiz>,
}

/// Title search hits grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    /// Trimmed query text.
    pub query: String,
    pub posts: Vec<LinkItem>,
    pub notes: Vec<LinkItem>,
}

/// Discovery service facade over repositories and a URL resolver.
pub struct DiscoveryService<D, Q, U> {
    documents: D,
    quizzes: Q,
    resolver: U,
    tokenizer: Tokenizer,
    config: DiscoveryConfig,
}

impl<D, Q> DiscoveryService<D, Q, PathUrlResolver>
where
    D: DocumentRepository,
    Q: QuizRepository,
{
    /// Builds a service from validated configuration.
    pub fn from_config(documents: D, quizzes: Q, config: &FolioConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            documents,
            quizzes,
            config.url_resolver(),
            config.similarity_tokenizer()?,
            config.discovery.clone(),
        ))
    }
}

impl<D, Q, U> DiscoveryService<D, Q, U>
where
    D: DocumentRepository,
    Q: QuizRepository,
    U: UrlResolver,
{
    pub fn new(
        documents: D,
        quizzes: Q,
        resolver: U,
        tokenizer: Tokenizer,
        config: DiscoveryConfig,
    ) -> Self {
        Self {
            documents,
            quizzes,
            resolver,
            tokenizer,
            config,
        }
    }

    /// Loads one document with related links, category timeline and quiz.
    pub fn detail(&self, kind: DocumentKind, id: DocumentId) -> ServiceResult<DetailView> {
        let started_at = Instant::now();
        let document = self
            .documents
            .get_document(id)?
            .filter(|document| document.kind == kind)
            .ok_or(ServiceError::DocumentNotFound { kind, id })?;

        let related = self.related_for(&document)?;
        let timeline = self.timeline_for(&document)?;
        let quiz = self.quizzes.find_quiz(kind, id)?;

        debug!(
            "event=detail_render module=discover status=ok kind={} id={} related={} timeline={} quiz_questions={} duration_ms={}",
            kind,
            id,
            related.len(),
            timeline.len(),
            quiz.as_ref().map_or(0, |quiz| quiz.questions.len()),
            started_at.elapsed().as_millis()
        );

        Ok(DetailView {
            document,
            related,
            timeline,
            quiz,
        })
    }

    /// Related links for `document`, best match first.
    pub fn related_for(&self, document: &Document) -> ServiceResult<Vec<LinkItem>> {
        let same_kind = self.documents.recent_documents(&RecentQuery {
            kind: document.kind,
            exclude: Some(document.id),
            limit: self.config.candidate_window,
        })?;
        let other_kind = self.documents.recent_documents(&RecentQuery {
            kind: document.kind.other(),
            exclude: None,
            limit: self.config.candidate_window,
        })?;

        Ok(rank_related(
            document,
            &same_kind,
            &other_kind,
            &self.tokenizer,
            &self.resolver,
            self.config.related_limit,
        ))
    }

    /// Same-category documents of both kinds, newest first.
    pub fn timeline_for(&self, document: &Document) -> ServiceResult<Vec<LinkItem>> {
        if document.category_tags.is_empty() {
            return Ok(Vec::new());
        }

        let same_kind = self
            .documents
            .documents_sharing_tags(document.kind, &document.category_tags)?;
        let other_kind = self
            .documents
            .documents_sharing_tags(document.kind.other(), &document.category_tags)?;

        Ok(build_timeline(
            document,
            &same_kind,
            &other_kind,
            &self.resolver,
            self.config.timeline_limit,
        ))
    }

    /// Newest documents across both kinds.
    pub fn recent_items(&self) -> ServiceResult<Vec<LinkItem>> {
        let notes = self.documents.recent_documents(&RecentQuery {
            kind: DocumentKind::Note,
            exclude: None,
            limit: self.config.recent_per_kind,
        })?;
        let posts = self.documents.recent_documents(&RecentQuery {
            kind: DocumentKind::Post,
            exclude: None,
            limit: self.config.recent_per_kind,
        })?;

        Ok(recent_items(
            &notes,
            &posts,
            &self.resolver,
            self.config.recent_limit,
        ))
    }

    /// Case-insensitive title search; a blank query returns no hits.
    pub fn search(&self, query: &str) -> ServiceResult<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchResults::default());
        }

        let posts = self
            .documents
            .search_titles(DocumentKind::Post, query, self.config.search_limit)?;
        let notes = self
            .documents
            .search_titles(DocumentKind::Note, query, self.config.search_limit)?;

        Ok(SearchResults {
            query: query.to_string(),
            posts: self.links(&posts),
            notes: self.links(&notes),
        })
    }

    fn links(&self, documents: &[Document]) -> Vec<LinkItem> {
        documents
            .iter()
            .map(|doc| LinkItem::for_document(doc, self.resolver.url_for(doc.kind, doc.id)))
            .collect()
    }
}
