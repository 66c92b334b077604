//! Related-content ranking and category timelines.
//!
//! # Responsibility
//! - Score candidate documents against a focal document.
//! - Merge same-category documents of both kinds into one recency list.
//!
//! # Invariants
//! - Pure over caller-supplied snapshots: no I/O, no shared state.
//! - The focal document never appears in its own related list or timeline.
//! - Ties keep input order (stable sort).
//!
//! # See also
//! - crate::service::discovery_service for the storage-backed entry point.

pub mod related;
pub mod timeline;
pub mod url;

pub use related::{rank_related, score_related, ScoredCandidate, DEFAULT_RELATED_LIMIT};
pub use timeline::{build_timeline, recent_items, DEFAULT_RECENT_LIMIT, DEFAULT_TIMELINE_LIMIT};
pub use url::{PathUrlResolver, UrlResolver};
