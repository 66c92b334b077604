//! Cross-reference value rendered in related/timeline lists.

use crate::model::document::{Document, DocumentKind};
use serde::{Deserialize, Serialize};

/// Link to another document, alive for one render only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkItem {
    pub kind: DocumentKind,
    pub title: String,
    /// Canonical timestamp of the target, epoch milliseconds.
    pub timestamp: i64,
    pub url: String,
}

impl LinkItem {
    /// Builds a link for `doc` using an already resolved `url`.
    pub fn for_document(doc: &Document, url: String) -> Self {
        Self {
            kind: doc.kind,
            title: doc.title.clone(),
            timestamp: doc.primary_timestamp(),
            url,
        }
    }
}
