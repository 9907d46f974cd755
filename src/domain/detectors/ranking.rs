//! Shared ranking helpers.
//!
//! Every detector result set is sorted on a descending numeric key. Equal
//! keys fall back to an explicit, deterministic secondary key so repeated
//! runs over an unchanged snapshot produce byte-identical orderings on any
//! platform.

/// Sorts descending by `score`, breaking ties ascending on `tie_break`,
/// then truncates to `limit`.
pub(crate) fn rank_desc<T, K, S, F>(mut items: Vec<T>, limit: usize, score: S, tie_break: F) -> Vec<T>
where
    K: Ord,
    S: Fn(&T) -> f64,
    F: Fn(&T) -> K,
{
    items.sort_by(|a, b| {
        score(b)
            .total_cmp(&score(a))
            .then_with(|| tie_break(a).cmp(&tie_break(b)))
    });
    items.truncate(limit);
    items
}

/// Per-rule slice size for combined views: three rules share the limit.
pub(crate) fn combined_slice(limit: usize) -> usize {
    limit / 3
}
