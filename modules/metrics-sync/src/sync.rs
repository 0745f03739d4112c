//! One metrics sync for one account.
//!
//! fetch → purge artifacts → load posts → reconcile → apply.
//!
//! All I/O happens before or after the reconciliation pass, never during
//! it. Instructions are applied in a single `apply_metrics` call, so a
//! failure anywhere upstream leaves the account's metrics untouched.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use post_reconcile::{reconcile_with_report, AccountId, ReconcileOptions, TierCounts};

use crate::store::{PostStore, ScrapedSource};

/// What a sync did, for the caller to report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncSummary {
    pub fetched: usize,
    pub purged: usize,
    pub pool_size: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub tier_counts: TierCounts,
}

impl SyncSummary {
    pub fn match_rate(&self) -> f64 {
        if self.fetched == 0 {
            return 0.0;
        }
        self.matched as f64 / self.fetched as f64
    }
}

pub async fn sync_account(
    source: &dyn ScrapedSource,
    store: &dyn PostStore,
    account: AccountId,
    options: &ReconcileOptions,
) -> Result<SyncSummary> {
    options.validate().context("Invalid reconcile options")?;

    let records = source
        .fetch(account)
        .await
        .with_context(|| format!("Failed to fetch scraped posts for account {account}"))?;

    let purged = store
        .purge_artifacts(account)
        .await
        .with_context(|| format!("Failed to purge sync artifacts for account {account}"))?;
    if purged > 0 {
        warn!(%account, purged, "Purged posts left behind by earlier syncs");
    }

    let posts = store
        .load_posts(account)
        .await
        .with_context(|| format!("Failed to load posts for account {account}"))?;

    let report = reconcile_with_report(&records, &posts, options)
        .with_context(|| format!("Reconciliation failed for account {account}"))?;

    if !report.instructions.is_empty() {
        store
            .apply_metrics(account, &report.instructions)
            .await
            .with_context(|| format!("Failed to apply metrics for account {account}"))?;
    }

    let summary = SyncSummary {
        fetched: records.len(),
        purged,
        pool_size: posts.len(),
        matched: report.matched(),
        unmatched: report.unmatched(),
        tier_counts: report.tier_counts(),
    };

    info!(
        %account,
        fetched = summary.fetched,
        matched = summary.matched,
        unmatched = summary.unmatched,
        match_rate_pct = summary.match_rate() * 100.0,
        "Metrics sync complete"
    );

    Ok(summary)
}
