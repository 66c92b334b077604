//! Document locator resolution.

use crate::model::document::{DocumentId, DocumentKind};

/// Maps `(kind, id)` to the canonical locator of a detail page.
pub trait UrlResolver {
    fn url_for(&self, kind: DocumentKind, id: DocumentId) -> String;
}

/// Prefix-based resolver: `{prefix}{id}/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathUrlResolver {
    post_prefix: String,
    note_prefix: String,
}

impl PathUrlResolver {
    /// Creates a resolver; prefixes get a trailing `/` when missing.
    pub fn new(post_prefix: impl Into<String>, note_prefix: impl Into<String>) -> Self {
        Self {
            post_prefix: with_trailing_slash(post_prefix.into()),
            note_prefix: with_trailing_slash(note_prefix.into()),
        }
    }
}

impl Default for PathUrlResolver {
    fn default() -> Self {
        Self::new("/blog/", "/notes/")
    }
}

impl UrlResolver for PathUrlResolver {
    fn url_for(&self, kind: DocumentKind, id: DocumentId) -> String {
        let prefix = match kind {
            DocumentKind::Post => self.post_prefix.as_str(),
            DocumentKind::Note => self.note_prefix.as_str(),
        };
        format!("{prefix}{id}/")
    }
}

impl<R: UrlResolver + ?Sized> UrlResolver for &R {
    fn url_for(&self, kind: DocumentKind, id: DocumentId) -> String {
        (**self).url_for(kind, id)
    }
}

fn with_trailing_slash(mut prefix: String) -> String {
    if !prefix.ends_with('/') {
        prefix.push('/');
    }
    prefix
}
