//! Retrieval quality metrics.
//!
//! Standard information-retrieval metrics over ranked id lists:
//! - **Recall@k**: proportion of relevant items found in the results
//! - **Precision@k**: proportion of returned results that are relevant
//! - **MRR (Mean Reciprocal Rank)**: quality of the first relevant hit
//!
//! plus the factorized evaluation helpers used during training, where each
//! validation pair is ranked against the full candidate catalog.
//!
//! # Example
//!
//! ```rust
//! use tagrec_core::metrics::{recall_at_k, precision_at_k, mrr};
//!
//! let relevant = vec!["r1", "r2", "r3"];
//! let results = vec!["r1", "r9", "r2"];
//!
//! assert!((recall_at_k(&relevant, &results) - 2.0 / 3.0).abs() < 1e-9);
//! assert!((precision_at_k(&relevant, &results) - 2.0 / 3.0).abs() < 1e-9);
//! assert!((mrr(&relevant, &results) - 1.0).abs() < 1e-9);
//! ```

use std::collections::HashSet;
use std::hash::Hash;

/// Calculates Recall@k: the proportion of relevant items found in the results.
///
/// # Formula
///
/// `recall@k = |relevant ∩ results| / |relevant|`
///
/// Returns 0.0 if `relevant` is empty (to avoid division by zero).
#[must_use]
pub fn recall_at_k<T: Eq + Hash + Copy>(relevant: &[T], results: &[T]) -> f64 {
    if relevant.is_empty() {
        return 0.0;
    }

    let relevant_set: HashSet<T> = relevant.iter().copied().collect();
    let found = results
        .iter()
        .filter(|id| relevant_set.contains(id))
        .count();

    #[allow(clippy::cast_precision_loss)]
    let recall = found as f64 / relevant.len() as f64;
    recall
}

/// Calculates Precision@k: the proportion of returned results that are relevant.
///
/// # Formula
///
/// `precision@k = |relevant ∩ results| / |results|`
///
/// Returns 0.0 if `results` is empty (to avoid division by zero).
#[must_use]
pub fn precision_at_k<T: Eq + Hash + Copy>(relevant: &[T], results: &[T]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }

    let relevant_set: HashSet<T> = relevant.iter().copied().collect();
    let hits = results
        .iter()
        .filter(|id| relevant_set.contains(id))
        .count();

    #[allow(clippy::cast_precision_loss)]
    let precision = hits as f64 / results.len() as f64;
    precision
}

/// Calculates Mean Reciprocal Rank: `1 / rank` of the first relevant result.
///
/// Returns 0.0 if no relevant result appears.
#[must_use]
pub fn mrr<T: Eq + Hash + Copy>(relevant: &[T], results: &[T]) -> f64 {
    let relevant_set: HashSet<T> = relevant.iter().copied().collect();

    for (rank, id) in results.iter().enumerate() {
        if relevant_set.contains(id) {
            #[allow(clippy::cast_precision_loss)]
            return 1.0 / (rank + 1) as f64;
        }
    }

    0.0
}

/// Rank of the true candidate within a score vector.
///
/// The rank is the number of candidates scoring strictly higher than the
/// true one, so rank 0 means the true candidate wins outright and ties do
/// not penalize it.
#[must_use]
pub fn factorized_rank(scores: &[f32], true_idx: usize) -> usize {
    let true_score = scores[true_idx];
    scores.iter().filter(|&&s| s > true_score).count()
}

/// Top-K accuracy at each cutoff for a set of per-query ranks.
///
/// A query counts as a hit at cutoff `k` when its rank is below `k`.
/// Returns `(k, 0.0)` pairs for an empty rank set.
#[must_use]
pub fn top_k_accuracies(ranks: &[usize], ks: &[usize]) -> Vec<(usize, f64)> {
    if ranks.is_empty() {
        return ks.iter().map(|&k| (k, 0.0)).collect();
    }

    #[allow(clippy::cast_precision_loss)]
    let n = ranks.len() as f64;
    ks.iter()
        .map(|&k| {
            let hits = ranks.iter().filter(|&&r| r < k).count();
            #[allow(clippy::cast_precision_loss)]
            let acc = hits as f64 / n;
            (k, acc)
        })
        .collect()
}
