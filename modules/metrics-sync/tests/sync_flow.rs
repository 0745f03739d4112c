//! Sync orchestration tests: MOCK → SYNC → STORE STATE.
//!
//! Register a scraped batch on MockSource, seed MemoryPostStore, run
//! sync_account, assert on the summary and the stored metric snapshots.

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use metrics_sync::testing::{MemoryPostStore, MockSource};
use metrics_sync::sync_account;
use post_reconcile::{
    AccountId, EngagementMetrics, ExternalRecord, InternalPost, PostId, PostOrigin,
    ReconcileOptions,
};

fn t() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 18, 30, 0).unwrap()
}

fn account() -> AccountId {
    AccountId(Uuid::new_v4())
}

fn metrics(views: u64) -> EngagementMetrics {
    EngagementMetrics {
        views,
        likes: views / 10,
        shares: 2,
        comments: 3,
        saves: 4,
    }
}

fn scraped(text: &str, views: u64) -> ExternalRecord {
    ExternalRecord::new(text, Some(t())).with_metrics(metrics(views))
}

fn tracked(description: &str, hours_before: i64) -> InternalPost {
    InternalPost::authored(PostId::new(), description, t() - Duration::hours(hours_before))
}

fn imported(description: &str) -> InternalPost {
    InternalPost {
        origin: PostOrigin::Imported,
        ..tracked(description, 1)
    }
}

#[tokio::test]
async fn matched_posts_receive_scraped_counters() {
    let acct = account();
    let routine = tracked("routine du matin", 3);
    let ebook = tracked("commente guide pour recevoir mon ebook", 20);
    let store = MemoryPostStore::new().with_posts(acct, vec![routine.clone(), ebook.clone()]);
    let source = MockSource::new().on_fetch(
        acct,
        vec![
            scraped("Ma routine du matin ☀️", 1_000),
            scraped("commente 'guide' pour recevoir mon ebook gratuit sur le mindset", 2_000),
            scraped("unboxing du nouveau setup", 3_000),
        ],
    );

    let summary = sync_account(&source, &store, acct, &ReconcileOptions::default())
        .await
        .unwrap();

    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.pool_size, 2);
    assert_eq!(summary.matched, 2);
    assert_eq!(summary.unmatched, 1);
    assert_eq!(summary.tier_counts.inclusion, 1);
    assert_eq!(summary.tier_counts.similarity, 1);
    assert_eq!(store.metrics_for(routine.id), Some(metrics(1_000)));
    assert_eq!(store.metrics_for(ebook.id), Some(metrics(2_000)));
    assert_eq!(store.apply_calls(), 1);
}

#[tokio::test]
async fn resync_replaces_rather_than_adds() {
    let acct = account();
    let routine = tracked("routine du matin", 3);
    let store = MemoryPostStore::new()
        .with_posts(acct, vec![routine.clone()])
        .with_metrics(routine.id, metrics(100));
    let source = MockSource::new().on_fetch(acct, vec![scraped("ma routine du matin", 1_500)]);

    sync_account(&source, &store, acct, &ReconcileOptions::default())
        .await
        .unwrap();
    sync_account(&source, &store, acct, &ReconcileOptions::default())
        .await
        .unwrap();

    assert_eq!(store.metrics_for(routine.id), Some(metrics(1_500)));
    assert_eq!(store.metrics_count(), 1);
}

#[tokio::test]
async fn artifacts_are_purged_before_matching() {
    let acct = account();
    let artifact = imported("routine du matin");
    let store = MemoryPostStore::new().with_posts(acct, vec![artifact.clone()]);
    let source = MockSource::new().on_fetch(acct, vec![scraped("ma routine du matin", 10)]);

    let summary = sync_account(&source, &store, acct, &ReconcileOptions::default())
        .await
        .unwrap();

    assert_eq!(summary.purged, 1);
    assert_eq!(summary.pool_size, 0);
    assert_eq!(summary.matched, 0);
    assert!(store.posts(acct).is_empty());
    assert_eq!(store.metrics_for(artifact.id), None);
    assert_eq!(store.apply_calls(), 0);
}

#[tokio::test]
async fn fetch_failure_touches_nothing() {
    let acct = account();
    let artifact = imported("routine du matin");
    let store = MemoryPostStore::new().with_posts(acct, vec![artifact]);
    let source = MockSource::new();

    let err = sync_account(&source, &store, acct, &ReconcileOptions::default())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Failed to fetch"));
    assert_eq!(store.posts(acct).len(), 1);
    assert_eq!(store.apply_calls(), 0);
}

#[tokio::test]
async fn apply_failure_leaves_metrics_unchanged() {
    let acct = account();
    let routine = tracked("routine du matin", 3);
    let ebook = tracked("mon ebook gratuit", 3);
    let store = MemoryPostStore::new()
        .with_posts(acct, vec![routine.clone(), ebook.clone()])
        .with_metrics(routine.id, metrics(100))
        .failing_applies();
    let source = MockSource::new().on_fetch(
        acct,
        vec![scraped("ma routine du matin", 900), scraped("mon ebook gratuit !", 800)],
    );

    let result = sync_account(&source, &store, acct, &ReconcileOptions::default()).await;

    assert!(result.is_err());
    assert_eq!(store.metrics_for(routine.id), Some(metrics(100)));
    assert_eq!(store.metrics_for(ebook.id), None);
}

#[tokio::test]
async fn invalid_options_fail_before_any_io() {
    let acct = account();
    let store = MemoryPostStore::new().with_posts(acct, vec![imported("routine du matin")]);
    let source = MockSource::new().on_fetch(acct, vec![scraped("ma routine du matin", 1)]);
    let opts = ReconcileOptions::builder().similarity_threshold(-1.0).build();

    assert!(sync_account(&source, &store, acct, &opts).await.is_err());
    assert_eq!(store.posts(acct).len(), 1);
}

#[tokio::test]
async fn duplicate_post_ids_abort_without_applying() {
    let acct = account();
    let routine = tracked("routine du matin", 3);
    let store = MemoryPostStore::new().with_posts(acct, vec![routine.clone(), routine.clone()]);
    let source = MockSource::new().on_fetch(acct, vec![scraped("ma routine du matin", 1)]);

    let err = sync_account(&source, &store, acct, &ReconcileOptions::default())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Reconciliation failed"));
    assert_eq!(store.apply_calls(), 0);
}

#[tokio::test]
async fn accounts_are_isolated() {
    let ours = account();
    let theirs = account();
    let their_post = tracked("routine du matin", 3);
    let store = MemoryPostStore::new().with_posts(theirs, vec![their_post.clone()]);
    let source = MockSource::new().on_fetch(ours, vec![scraped("ma routine du matin", 5)]);

    let summary = sync_account(&source, &store, ours, &ReconcileOptions::default())
        .await
        .unwrap();

    assert_eq!(summary.matched, 0);
    assert_eq!(store.metrics_for(their_post.id), None);
}

#[tokio::test]
async fn newest_post_wins_inclusion_tie() {
    let acct = account();
    let older = tracked("routine du matin", 30);
    let newer = tracked("routine du matin", 2);
    // inserted oldest first; the store hands them back newest first
    let store = MemoryPostStore::new().with_posts(acct, vec![older.clone(), newer.clone()]);
    let source = MockSource::new().on_fetch(acct, vec![scraped("ma routine du matin", 77)]);

    sync_account(&source, &store, acct, &ReconcileOptions::default())
        .await
        .unwrap();

    assert_eq!(store.metrics_for(newer.id), Some(metrics(77)));
    assert_eq!(store.metrics_for(older.id), None);
}
