//! Raw scraper datasets through decoding and reconciliation.

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;

use metrics_sync::{decode_dataset, decode_dataset_str, DecodeError, Platform};
use post_reconcile::{reconcile, InternalPost, PostId, ReconcileOptions};

#[test]
fn tiktok_dataset_drives_metric_instructions() {
    let published = Utc.with_ymd_and_hms(2025, 6, 1, 18, 30, 0).unwrap();
    let ebook = InternalPost::authored(
        PostId::new(),
        "commente guide pour recevoir mon ebook",
        published - Duration::hours(2),
    );
    let tips = InternalPost::authored(
        PostId::new(),
        "astuces productivité",
        published - Duration::hours(1),
    );

    let dataset = json!([
        {
            "id": "7380000000000000001",
            "text": "commente 'guide' pour recevoir mon ebook gratuit sur le mindset",
            "createTimeISO": "2025-06-01T18:30:00.000Z",
            "playCount": 48200,
            "diggCount": 3100,
            "shareCount": 210,
            "commentCount": 640,
            "collectCount": 980
        },
        {
            "id": "7380000000000000002",
            "text": "",
            "createTime": 1748802600,
            "playCount": 10
        }
    ]);

    let batch = decode_dataset(Platform::TikTok, &dataset).unwrap();
    assert_eq!(batch.records.len(), 2);
    assert_eq!(batch.skipped, 0);

    let out = reconcile(&batch.records, &[tips, ebook.clone()], &ReconcileOptions::default())
        .unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].post_id, ebook.id);
    assert_eq!(out[0].views, 48200);
    assert_eq!(out[0].likes, 3100);
    assert_eq!(out[0].shares, 210);
    assert_eq!(out[0].comments, 640);
    assert_eq!(out[0].saves, 980);
}

#[test]
fn instagram_item_with_bad_timestamp_still_matches() {
    let post = InternalPost::authored(
        PostId::new(),
        "Recette carbonara",
        Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap(),
    );
    let batch = decode_dataset_str(
        Platform::Instagram,
        r#"[{ "caption": "RECETTE CARBONARA 🍝 #food", "timestamp": "yesterday", "likesCount": 12 }]"#,
    )
    .unwrap();

    assert_eq!(batch.records[0].created_at, None);
    let out = reconcile(&batch.records, &[post.clone()], &ReconcileOptions::default()).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].post_id, post.id);
    assert_eq!(out[0].likes, 12);
}

#[test]
fn malformed_json_is_a_decode_error() {
    let err = decode_dataset_str(Platform::TikTok, "[{").unwrap_err();
    assert!(matches!(err, DecodeError::Json(_)));
}

#[test]
fn null_dataset_is_rejected() {
    let err = decode_dataset_str(Platform::TikTok, "null").unwrap_err();
    assert!(matches!(err, DecodeError::NotAnArray { found: "null" }));
}
