//! Document domain model.
//!
//! # Responsibility
//! - Define the tagged-variant projection over posts and notes.
//! - Resolve the canonical timestamp per kind in one place.
//! - Derive stable category slugs from display names.
//!
//! # Invariants
//! - `id` is stable and never reused for another document.
//! - Posts order by `created_at`, notes order by `updated_at`.
//! - `category_tags` holds category slugs, never display names.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every document of either kind.
pub type DocumentId = Uuid;

/// The two symmetric content kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Long-form blog post. Canonical timestamp is creation time.
    Post,
    /// Study note. Canonical timestamp is last update time.
    Note,
}

impl DocumentKind {
    /// Storage/wire name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Note => "note",
        }
    }

    /// Parses a storage/wire name (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "post" => Some(Self::Post),
            "note" => Some(Self::Note),
            _ => None,
        }
    }

    /// The opposite kind.
    pub fn other(self) -> Self {
        match self {
            Self::Post => Self::Note,
            Self::Note => Self::Post,
        }
    }
}

impl Display for DocumentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for document data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentValidationError {
    NilId,
    EmptyTitle,
    UpdatedBeforeCreated { created_at: i64, updated_at: i64 },
}

impl Display for DocumentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "id must not be nil"),
            Self::EmptyTitle => write!(f, "title must not be blank"),
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at ({updated_at}) must be >= created_at ({created_at})"
            ),
        }
    }
}

impl Error for DocumentValidationError {}

/// Read-only snapshot of one post or note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub kind: DocumentKind,
    pub title: String,
    /// Body text, may contain HTML markup.
    pub body: String,
    /// Category slugs attached to this document.
    #[serde(default)]
    pub category_tags: BTreeSet<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

impl Document {
    /// Creates a document with a generated id and both timestamps set to `now_ms`.
    pub fn new(
        kind: DocumentKind,
        title: impl Into<String>,
        body: impl Into<String>,
        now_ms: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            body: body.into(),
            category_tags: BTreeSet::new(),
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Timestamp used for every recency ordering of this document.
    pub fn primary_timestamp(&self) -> i64 {
        match self.kind {
            DocumentKind::Post => self.created_at,
            DocumentKind::Note => self.updated_at,
        }
    }

    /// Text fed to the tokenizer: title and body joined by one space.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }

    /// Checks data invariants before persistence.
    pub fn validate(&self) -> Result<(), DocumentValidationError> {
        if self.id.is_nil() {
            return Err(DocumentValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(DocumentValidationError::EmptyTitle);
        }
        if self.updated_at < self.created_at {
            return Err(DocumentValidationError::UpdatedBeforeCreated {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }
}

/// A named category shared by posts and notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
}

/// Derives the base slug for a category name.
///
/// Lowercases, keeps ASCII alphanumerics and Hangul syllables, collapses every
/// other run into one `-`. Falls back to `category` when nothing survives.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() || ('\u{AC00}'..='\u{D7A3}').contains(&ch) {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "category".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::{slugify, Document, DocumentKind, DocumentValidationError};

    #[test]
    fn primary_timestamp_follows_kind() {
        let mut post = Document::new(DocumentKind::Post, "p", "", 100);
        post.updated_at = 500;
        assert_eq!(post.primary_timestamp(), 100);

        let mut note = Document::new(DocumentKind::Note, "n", "", 100);
        note.updated_at = 500;
        assert_eq!(note.primary_timestamp(), 500);
    }

    #[test]
    fn kind_parse_is_case_insensitive() {
        assert_eq!(DocumentKind::parse(" POST "), Some(DocumentKind::Post));
        assert_eq!(DocumentKind::parse("note"), Some(DocumentKind::Note));
        assert_eq!(DocumentKind::parse("page"), None);
    }

    #[test]
    fn validate_rejects_blank_title() {
        let doc = Document::new(DocumentKind::Note, "   ", "body", 1);
        assert_eq!(doc.validate(), Err(DocumentValidationError::EmptyTitle));
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("AI-Math"), "ai-math");
        assert_eq!(slugify("  UI / UX  "), "ui-ux");
        assert_eq!(slugify("백엔드 기초"), "백엔드-기초");
        assert_eq!(slugify("!!!"), "category");
    }
}
