//! Jaccard overlap between token sets.

use std::collections::BTreeSet;

/// Returns `|a ∩ b| / |a ∪ b|`, or `0.0` when either set is empty.
pub fn similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}
