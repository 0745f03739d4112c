use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Stable identifier of a tracked post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub Uuid);

impl PostId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for PostId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for PostId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Creator account that owns a set of posts. Every sync is scoped to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub Uuid);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for AccountId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Lifetime engagement counters as reported by the scraper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    pub views: u64,
    pub likes: u64,
    pub shares: u64,
    pub comments: u64,
    pub saves: u64,
}

/// A post as returned by the external scraper. It carries no identifier
/// shared with tracked posts; within a batch it is identified by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalRecord {
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metrics: EngagementMetrics,
}

impl ExternalRecord {
    pub fn new(text: impl Into<String>, created_at: Option<DateTime<Utc>>) -> Self {
        Self {
            text: text.into(),
            created_at,
            metrics: EngagementMetrics::default(),
        }
    }

    pub fn with_metrics(mut self, metrics: EngagementMetrics) -> Self {
        self.metrics = metrics;
        self
    }
}

/// How a tracked post came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostOrigin {
    /// Created by the creator through the app's own tooling.
    Authored,
    /// Created as a byproduct of an earlier sync. Never a match candidate.
    Imported,
}

/// A post already tracked for the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalPost {
    pub id: PostId,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub origin: PostOrigin,
}

impl InternalPost {
    pub fn authored(
        id: PostId,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            description: Some(description.into()),
            created_at,
            origin: PostOrigin::Authored,
        }
    }

    pub fn is_artifact(&self) -> bool {
        self.origin == PostOrigin::Imported
    }

    /// The description as a matching key: trimmed, `None` when absent.
    pub(crate) fn matching_key(&self) -> Option<&str> {
        self.description.as_deref().map(str::trim)
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Which tier of the matching cascade produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// The description appears verbatim (case-insensitive) in the caption.
    Inclusion,
    /// Best bigram similarity cleared the confidence threshold.
    Similarity,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchTier::Inclusion => write!(f, "inclusion"),
            MatchTier::Similarity => write!(f, "similarity"),
        }
    }
}

/// Outcome of resolving one external record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Position of the external record in its batch.
    pub record_index: usize,
    pub post_id: Option<PostId>,
    pub tier: Option<MatchTier>,
    /// Score that produced the match; for no-match, the best score seen.
    pub score: f64,
}

impl MatchResult {
    pub fn unmatched(record_index: usize, best_score: f64) -> Self {
        Self {
            record_index,
            post_id: None,
            tier: None,
            score: best_score,
        }
    }

    pub fn is_match(&self) -> bool {
        self.post_id.is_some()
    }
}

/// Full replacement of a post's metric snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsUpsertInstruction {
    pub post_id: PostId,
    pub views: u64,
    pub likes: u64,
    pub shares: u64,
    pub comments: u64,
    pub saves: u64,
}

impl MetricsUpsertInstruction {
    pub fn replace(post_id: PostId, metrics: &EngagementMetrics) -> Self {
        Self {
            post_id,
            views: metrics.views,
            likes: metrics.likes,
            shares: metrics.shares,
            comments: metrics.comments,
            saves: metrics.saves,
        }
    }

    pub fn metrics(&self) -> EngagementMetrics {
        EngagementMetrics {
            views: self.views,
            likes: self.likes,
            shares: self.shares,
            comments: self.comments,
            saves: self.saves,
        }
    }
}
