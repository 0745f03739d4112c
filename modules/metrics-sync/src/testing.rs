// Test doubles for the sync boundaries.
//
// - MockSource (ScrapedSource): HashMap-based account→records
// - MemoryPostStore (PostStore): stateful in-memory posts and metric snapshots

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use post_reconcile::{
    AccountId, EngagementMetrics, ExternalRecord, InternalPost, MetricsUpsertInstruction, PostId,
};

use crate::store::{PostStore, ScrapedSource};

// ---------------------------------------------------------------------------
// MockSource
// ---------------------------------------------------------------------------

/// Returns `Err` for accounts with nothing registered.
#[derive(Default)]
pub struct MockSource {
    batches: HashMap<AccountId, Vec<ExternalRecord>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_fetch(mut self, account: AccountId, records: Vec<ExternalRecord>) -> Self {
        self.batches.insert(account, records);
        self
    }
}

#[async_trait]
impl ScrapedSource for MockSource {
    async fn fetch(&self, account: AccountId) -> Result<Vec<ExternalRecord>> {
        self.batches
            .get(&account)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("MockSource: no batch registered for {account}"))
    }
}

// ---------------------------------------------------------------------------
// MemoryPostStore
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryPostStoreInner {
    posts: HashMap<AccountId, Vec<InternalPost>>,
    metrics: HashMap<PostId, EngagementMetrics>,
    apply_calls: usize,
    fail_on_apply: bool,
}

/// In-memory post store. Thread-safe via interior Mutex.
/// `apply_metrics` checks the whole batch before writing anything.
#[derive(Default)]
pub struct MemoryPostStore {
    inner: Mutex<MemoryPostStoreInner>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(self, account: AccountId, posts: Vec<InternalPost>) -> Self {
        self.inner
            .lock()
            .unwrap()
            .posts
            .entry(account)
            .or_default()
            .extend(posts);
        self
    }

    pub fn with_metrics(self, post_id: PostId, metrics: EngagementMetrics) -> Self {
        self.inner.lock().unwrap().metrics.insert(post_id, metrics);
        self
    }

    /// Make `apply_metrics` return an error without writing.
    pub fn failing_applies(self) -> Self {
        self.inner.lock().unwrap().fail_on_apply = true;
        self
    }

    pub fn metrics_for(&self, post_id: PostId) -> Option<EngagementMetrics> {
        self.inner.lock().unwrap().metrics.get(&post_id).copied()
    }

    pub fn metrics_count(&self) -> usize {
        self.inner.lock().unwrap().metrics.len()
    }

    pub fn apply_calls(&self) -> usize {
        self.inner.lock().unwrap().apply_calls
    }

    pub fn posts(&self, account: AccountId) -> Vec<InternalPost> {
        self.inner
            .lock()
            .unwrap()
            .posts
            .get(&account)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn purge_artifacts(&self, account: AccountId) -> Result<usize> {
        let mut inner = self.inner.lock().unwrap();
        let Some(posts) = inner.posts.get_mut(&account) else {
            return Ok(0);
        };
        let before = posts.len();
        posts.retain(|p| !p.is_artifact());
        Ok(before - posts.len())
    }

    async fn load_posts(&self, account: AccountId) -> Result<Vec<InternalPost>> {
        let mut posts = self.posts(account);
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn apply_metrics(
        &self,
        account: AccountId,
        instructions: &[MetricsUpsertInstruction],
    ) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.apply_calls += 1;
        if inner.fail_on_apply {
            bail!("MemoryPostStore: apply_metrics configured to fail");
        }

        let owned = inner.posts.get(&account).cloned().unwrap_or_default();
        for instruction in instructions {
            if !owned.iter().any(|p| p.id == instruction.post_id) {
                bail!(
                    "MemoryPostStore: post {} does not belong to account {account}",
                    instruction.post_id
                );
            }
        }

        for instruction in instructions {
            inner
                .metrics
                .insert(instruction.post_id, instruction.metrics());
        }
        Ok(())
    }
}
