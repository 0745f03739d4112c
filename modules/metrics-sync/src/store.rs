// Collaborator boundaries for a metrics sync.
//
// ScrapedSource: hands over an already-fetched batch of scraped records.
// PostStore: owner-scoped tracked posts plus the metric snapshot table.
//
// Both are traits so the sync can run against MockSource/MemoryPostStore
// in tests: no network, no database.

use anyhow::Result;
use async_trait::async_trait;

use post_reconcile::{AccountId, ExternalRecord, InternalPost, MetricsUpsertInstruction};

#[async_trait]
pub trait ScrapedSource: Send + Sync {
    /// The account's scraped posts, fully fetched. Pagination is the
    /// implementation's concern.
    async fn fetch(&self, account: AccountId) -> Result<Vec<ExternalRecord>>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Delete posts created as byproducts of earlier syncs. Returns how many
    /// were removed.
    async fn purge_artifacts(&self, account: AccountId) -> Result<usize>;

    /// The account's tracked posts, excluding soft-deleted ones, most
    /// recently created first.
    async fn load_posts(&self, account: AccountId) -> Result<Vec<InternalPost>>;

    /// Apply every instruction or none. Each instruction creates the post's
    /// metric snapshot if absent, otherwise replaces all of its fields.
    async fn apply_metrics(
        &self,
        account: AccountId,
        instructions: &[MetricsUpsertInstruction],
    ) -> Result<()>;
}
