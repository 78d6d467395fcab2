//! Cross-source merge: one ranked list from per-source result sets.
//!
//! Results are ordered by score descending. Scores closer than
//! [`SCORE_EPSILON`] are treated as a tie and ordered by source priority,
//! so curator-assigned source order decides between near-equal matches
//! rather than floating-point noise.
//!
//! A pairwise "within epsilon" comparator is not transitive, so ties are
//! resolved in clusters: after a plain score sort, each cluster spans the
//! results within epsilon of the cluster's first (highest) score, and each
//! cluster is then stably re-sorted by priority.

use std::cmp::Ordering;

use crate::types::SearchResult;

/// Scores differing by no more than this are considered tied.
pub const SCORE_EPSILON: f64 = 0.01;

/// Merge per-source result sets into one globally ordered list.
///
/// Within a tie cluster, equal priorities keep score order and then input
/// order, so passing sources in a fixed order gives a deterministic result.
pub fn merge_results(per_source: Vec<Vec<SearchResult>>) -> Vec<SearchResult> {
    let mut all: Vec<SearchResult> = per_source.into_iter().flatten().collect();
    rank(&mut all);
    all
}

/// Sort `results` in place by score, breaking near-ties by priority.
pub fn rank(results: &mut [SearchResult]) {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut start = 0;
    while start < results.len() {
        let anchor = results[start].score;
        let end = results[start..]
            .iter()
            .position(|r| anchor - r.score > SCORE_EPSILON)
            .map_or(results.len(), |offset| start + offset);
        results[start..end].sort_by(by_priority_then_score);
        start = end;
    }
}

fn by_priority_then_score(a: &SearchResult, b: &SearchResult) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| b.score.total_cmp(&a.score))
}

/// Group merged results by source, in order of each source's first
/// appearance. Order within a group is preserved.
pub fn group_by_source(results: &[SearchResult]) -> Vec<(&str, Vec<&SearchResult>)> {
    let mut groups: Vec<(&str, Vec<&SearchResult>)> = Vec::new();
    for result in results {
        match groups.iter_mut().find(|(name, _)| *name == result.source) {
            Some((_, members)) => members.push(result),
            None => groups.push((result.source.as_str(), vec![result])),
        }
    }
    groups
}
