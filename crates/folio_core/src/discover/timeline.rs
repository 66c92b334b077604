//! Category timeline and cross-kind recency lists.

use crate::discover::url::UrlResolver;
use crate::model::document::Document;
use crate::model::link::LinkItem;
use std::collections::HashSet;

/// Timeline entries shown per detail page.
pub const DEFAULT_TIMELINE_LIMIT: usize = 20;
/// Entries in the cross-kind "recent" sidebar.
pub const DEFAULT_RECENT_LIMIT: usize = 8;

/// Documents sharing a category with `focal`, newest first.
///
/// `same_kind_docs` and `other_kind_docs` are the caller's tag-filtered
/// snapshots. The focal document is excluded from both, and a document
/// matched through several shared tags appears once.
pub fn build_timeline<U: UrlResolver + ?Sized>(
    focal: &Document,
    same_kind_docs: &[Document],
    other_kind_docs: &[Document],
    resolver: &U,
    limit: usize,
) -> Vec<LinkItem> {
    if focal.category_tags.is_empty() {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let candidates = same_kind_docs
        .iter()
        .chain(other_kind_docs.iter())
        .filter(|doc| !(doc.id == focal.id && doc.kind == focal.kind))
        .filter(|doc| seen.insert((doc.kind, doc.id)));
    merge_by_recency(candidates, resolver, limit)
}

/// Newest documents across both kinds.
pub fn recent_items<U: UrlResolver + ?Sized>(
    first: &[Document],
    second: &[Document],
    resolver: &U,
    limit: usize,
) -> Vec<LinkItem> {
    merge_by_recency(first.iter().chain(second.iter()), resolver, limit)
}

fn merge_by_recency<'a, U: UrlResolver + ?Sized>(
    docs: impl Iterator<Item = &'a Document>,
    resolver: &U,
    limit: usize,
) -> Vec<LinkItem> {
    let mut items = docs
        .map(|doc| LinkItem::for_document(doc, resolver.url_for(doc.kind, doc.id)))
        .collect::<Vec<_>>();
    items.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));
    items.truncate(limit);
    items
}

#[cfg(test)]
mod tests {
    use super::{build_timeline, recent_items};
    use crate::discover::url::PathUrlResolver;
    use crate::model::document::{Document, DocumentKind};

    fn tagged(kind: DocumentKind, title: &str, ts: i64, tags: &[&str]) -> Document {
        let mut doc = Document::new(kind, title, "", ts);
        doc.category_tags = tags.iter().map(|tag| tag.to_string()).collect();
        doc
    }

    #[test]
    fn untagged_focal_has_empty_timeline() {
        let focal = tagged(DocumentKind::Post, "focal", 1, &[]);
        let others = vec![tagged(DocumentKind::Post, "other", 2, &["rust"])];
        let items = build_timeline(&focal, &others, &others, &PathUrlResolver::default(), 20);
        assert!(items.is_empty());
    }

    #[test]
    fn merges_kinds_newest_first_without_focal_or_duplicates() {
        let focal = tagged(DocumentKind::Post, "focal", 50, &["rust"]);
        let post = tagged(DocumentKind::Post, "older post", 10, &["rust"]);
        let posts = vec![focal.clone(), post.clone(), post];
        let notes = vec![
            tagged(DocumentKind::Note, "newest note", 90, &["rust"]),
            tagged(DocumentKind::Note, "middle note", 30, &["rust", "db"]),
        ];

        let items = build_timeline(&focal, &posts, &notes, &PathUrlResolver::default(), 20);
        let titles = items.iter().map(|item| item.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["newest note", "middle note", "older post"]);
    }

    #[test]
    fn timeline_respects_limit() {
        let focal = tagged(DocumentKind::Note, "focal", 0, &["x"]);
        let notes = (1..=30)
            .map(|ts| tagged(DocumentKind::Note, "n", ts, &["x"]))
            .collect::<Vec<_>>();
        let items = build_timeline(&focal, &notes, &[], &PathUrlResolver::default(), 20);
        assert_eq!(items.len(), 20);
        assert_eq!(items[0].timestamp, 30);
    }

    #[test]
    fn recent_items_uses_canonical_timestamps() {
        let mut post = tagged(DocumentKind::Post, "post", 10, &[]);
        post.updated_at = 100;
        let mut note = tagged(DocumentKind::Note, "note", 5, &[]);
        note.updated_at = 20;

        let items = recent_items(&[post], &[note], &PathUrlResolver::default(), 8);
        let titles = items.iter().map(|item| item.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["note", "post"]);
    }
}
