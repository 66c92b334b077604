//! Related-content ranking across both document kinds.

use crate::discover::url::UrlResolver;
use crate::model::document::Document;
use crate::model::link::LinkItem;
use crate::text::{similarity, Tokenizer};

/// Related links shown per detail page.
pub const DEFAULT_RELATED_LIMIT: usize = 6;

/// One candidate with a positive similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate<'a> {
    pub score: f64,
    pub document: &'a Document,
}

/// Scores every candidate against `focal` and keeps the best `limit`.
///
/// Candidates are visited as `primary_pool` then `secondary_pool`; that order
/// breaks score ties. Zero scores and the focal document itself are dropped.
pub fn score_related<'a>(
    focal: &Document,
    primary_pool: &'a [Document],
    secondary_pool: &'a [Document],
    tokenizer: &Tokenizer,
    limit: usize,
) -> Vec<ScoredCandidate<'a>> {
    let focal_tokens = tokenizer.tokenize(&focal.searchable_text());
    if focal_tokens.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut scored = primary_pool
        .iter()
        .chain(secondary_pool.iter())
        .filter(|candidate| !(candidate.id == focal.id && candidate.kind == focal.kind))
        .filter_map(|candidate| {
            let score = similarity(
                &focal_tokens,
                &tokenizer.tokenize(&candidate.searchable_text()),
            );
            (score > 0.0).then_some(ScoredCandidate {
                score,
                document: candidate,
            })
        })
        .collect::<Vec<_>>();

    scored.sort_by(|left, right| right.score.total_cmp(&left.score));
    scored.truncate(limit);
    scored
}

/// Related links for `focal`, best match first.
pub fn rank_related<U: UrlResolver + ?Sized>(
    focal: &Document,
    primary_pool: &[Document],
    secondary_pool: &[Document],
    tokenizer: &Tokenizer,
    resolver: &U,
    limit: usize,
) -> Vec<LinkItem> {
    score_related(focal, primary_pool, secondary_pool, tokenizer, limit)
        .into_iter()
        .map(|candidate| {
            let doc = candidate.document;
            LinkItem::for_document(doc, resolver.url_for(doc.kind, doc.id))
        })
        .collect()
}
