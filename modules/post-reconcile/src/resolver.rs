//! Tiered match resolution for a single external record.
//!
//! Tiers are tried in priority order and the first one that produces a
//! qualifying match wins; a later tier never overrides an earlier one.
//!
//! 1. Inclusion: a candidate's description appears verbatim
//!    (case-insensitive) in the caption. First hit in pool order, score 1.0.
//! 2. Similarity: the candidate with the highest bigram similarity, if it
//!    reaches the configured threshold. Ties keep the earlier candidate.
//! 3. Otherwise no match.

use crate::options::ReconcileOptions;
use crate::similarity::similarity;
use crate::types::{ExternalRecord, InternalPost, MatchResult, MatchTier};

/// Picks at most one candidate for `external`. `candidates` is expected to
/// come from [`filter_candidates`](crate::candidates::filter_candidates).
pub fn resolve(
    record_index: usize,
    external: &ExternalRecord,
    candidates: &[&InternalPost],
    options: &ReconcileOptions,
) -> MatchResult {
    if external.text.trim().is_empty() || candidates.is_empty() {
        return MatchResult::unmatched(record_index, 0.0);
    }

    let text = external.text.to_lowercase();

    if let Some(post) = inclusion_match(&text, candidates) {
        return MatchResult {
            record_index,
            post_id: Some(post.id),
            tier: Some(MatchTier::Inclusion),
            score: 1.0,
        };
    }

    match best_similarity(&text, candidates) {
        Some((post, score)) if score >= options.similarity_threshold => MatchResult {
            record_index,
            post_id: Some(post.id),
            tier: Some(MatchTier::Similarity),
            score,
        },
        Some((_, score)) => MatchResult::unmatched(record_index, score),
        None => MatchResult::unmatched(record_index, 0.0),
    }
}

/// First candidate whose lower-cased description is a substring of `text`.
/// `text` must already be lower-cased.
fn inclusion_match<'a>(text: &str, candidates: &[&'a InternalPost]) -> Option<&'a InternalPost> {
    candidates.iter().copied().find(|post| {
        post.matching_key()
            .filter(|key| !key.is_empty())
            .is_some_and(|key| text.contains(key.to_lowercase().as_str()))
    })
}

/// Highest-scoring candidate. Only a strictly greater score replaces the
/// current best, so equal scores resolve to pool order.
fn best_similarity<'a>(
    text: &str,
    candidates: &[&'a InternalPost],
) -> Option<(&'a InternalPost, f64)> {
    let mut best: Option<(&InternalPost, f64)> = None;
    for post in candidates.iter().copied() {
        let Some(key) = post.matching_key() else {
            continue;
        };
        let score = similarity(text, key);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((post, score)),
        }
    }
    best
}
