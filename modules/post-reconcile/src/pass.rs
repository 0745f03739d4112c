//! The batch reconciliation pass.
//!
//! Records are processed strictly in input order: a post consumed by an
//! earlier record is removed from every later record's candidate pool, so
//! the loop cannot be reordered or parallelized without changing results.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::candidates::filter_candidates;
use crate::error::{ReconcileError, Result};
use crate::options::ReconcileOptions;
use crate::resolver::resolve;
use crate::types::{
    ExternalRecord, InternalPost, MatchResult, MatchTier, MetricsUpsertInstruction, PostId,
};

/// Number of matches produced by each tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub inclusion: usize,
    pub similarity: usize,
}

/// Everything one pass decided, for callers that want visibility into
/// match rate and tier distribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcileReport {
    /// One entry per external record, in input order.
    pub results: Vec<MatchResult>,
    /// One entry per match, in external-record order.
    pub instructions: Vec<MetricsUpsertInstruction>,
}

impl ReconcileReport {
    pub fn matched(&self) -> usize {
        self.instructions.len()
    }

    pub fn unmatched(&self) -> usize {
        self.results.len() - self.matched()
    }

    /// Fraction of external records that matched; 0.0 for an empty batch.
    pub fn match_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.matched() as f64 / self.results.len() as f64
    }

    pub fn tier_counts(&self) -> TierCounts {
        self.results
            .iter()
            .fold(TierCounts::default(), |mut counts, r| {
                match r.tier {
                    Some(MatchTier::Inclusion) => counts.inclusion += 1,
                    Some(MatchTier::Similarity) => counts.similarity += 1,
                    None => {}
                }
                counts
            })
    }
}

/// Matches `external_records` against `internal_posts` and returns one
/// full-replace metrics instruction per match, in external-record order.
///
/// Pure and deterministic: the same inputs always produce the same output,
/// so the whole pass is safe to retry.
pub fn reconcile(
    external_records: &[ExternalRecord],
    internal_posts: &[InternalPost],
    options: &ReconcileOptions,
) -> Result<Vec<MetricsUpsertInstruction>> {
    reconcile_with_report(external_records, internal_posts, options).map(|r| r.instructions)
}

/// Like [`reconcile`], but also returns the per-record match results.
pub fn reconcile_with_report(
    external_records: &[ExternalRecord],
    internal_posts: &[InternalPost],
    options: &ReconcileOptions,
) -> Result<ReconcileReport> {
    options.validate()?;
    validate_pool(internal_posts)?;

    let mut consumed: HashSet<PostId> = HashSet::new();
    let mut report = ReconcileReport {
        results: Vec::with_capacity(external_records.len()),
        instructions: Vec::new(),
    };

    for (index, record) in external_records.iter().enumerate() {
        let candidates = filter_candidates(record, internal_posts, &consumed, options);
        let result = resolve(index, record, &candidates, options);

        match (result.post_id, result.tier) {
            (Some(post_id), Some(tier)) => {
                debug!(
                    record = index,
                    post_id = %post_id,
                    tier = %tier,
                    score = result.score,
                    candidates = candidates.len(),
                    "Matched scraped post"
                );
                consumed.insert(post_id);
                report
                    .instructions
                    .push(MetricsUpsertInstruction::replace(post_id, &record.metrics));
            }
            _ => {
                debug!(
                    record = index,
                    best_score = result.score,
                    candidates = candidates.len(),
                    "No confident match for scraped post"
                );
            }
        }

        report.results.push(result);
    }

    let tiers = report.tier_counts();
    info!(
        external = external_records.len(),
        pool = internal_posts.len(),
        matched = report.matched(),
        unmatched = report.unmatched(),
        match_rate_pct = report.match_rate() * 100.0,
        inclusion = tiers.inclusion,
        similarity = tiers.similarity,
        "Reconciliation pass complete"
    );

    Ok(report)
}

/// Rejects pools that would break the at-most-one-match guarantee.
fn validate_pool(internal_posts: &[InternalPost]) -> Result<()> {
    let mut seen = HashSet::with_capacity(internal_posts.len());
    for (index, post) in internal_posts.iter().enumerate() {
        if post.id.is_nil() {
            return Err(ReconcileError::NilPostId { index });
        }
        if !seen.insert(post.id) {
            return Err(ReconcileError::DuplicatePostId(post.id));
        }
    }
    Ok(())
}
