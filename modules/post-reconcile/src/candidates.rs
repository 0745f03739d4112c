//! Candidate pool narrowing for a single external record.

use std::collections::HashSet;

use crate::options::ReconcileOptions;
use crate::types::{ExternalRecord, InternalPost, PostId};

/// Narrows `pool` to the posts eligible to match `external`, preserving
/// pool order.
///
/// Consumed posts, reconciliation artifacts, and posts whose description
/// is too short to be a reliable key are always excluded. When the record
/// carries a timestamp, posts created within the time window are preferred;
/// if none are, the whole eligible pool is returned so backfilled posts
/// with irregular dates can still match.
pub fn filter_candidates<'a>(
    external: &ExternalRecord,
    pool: &'a [InternalPost],
    consumed: &HashSet<PostId>,
    options: &ReconcileOptions,
) -> Vec<&'a InternalPost> {
    let eligible: Vec<&InternalPost> = pool
        .iter()
        .filter(|post| !consumed.contains(&post.id))
        .filter(|post| !post.is_artifact())
        .filter(|post| has_usable_description(post, options.min_description_length))
        .collect();

    let Some(external_at) = external.created_at else {
        return eligible;
    };

    let window = options.time_window();
    let windowed: Vec<&InternalPost> = eligible
        .iter()
        .copied()
        .filter(|post| (post.created_at - external_at).abs() <= window)
        .collect();

    if windowed.is_empty() {
        eligible
    } else {
        windowed
    }
}

fn has_usable_description(post: &InternalPost, min_len: usize) -> bool {
    post.matching_key()
        .is_some_and(|key| key.chars().count() >= min_len)
}
