//! Scraper dataset items and their conversion into [`ExternalRecord`]s.
//!
//! Dataset items are loosely shaped: any field may be missing, counters
//! occasionally arrive as strings, and timestamps come in more than one
//! format. Everything is decoded leniently here so the reconciliation pass
//! only ever sees validated records. Content problems degrade (empty text,
//! no timestamp, zero counters); only a structurally wrong dataset is an
//! error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use post_reconcile::{EngagementMetrics, ExternalRecord};

use crate::error::DecodeError;

/// Which scraper produced a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    TikTok,
    Instagram,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::TikTok => write!(f, "tiktok"),
            Platform::Instagram => write!(f, "instagram"),
        }
    }
}

// --- TikTok ---

/// A single video from the TikTok profile scraper dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TikTokItem {
    pub id: Option<String>,
    pub text: Option<String>,
    #[serde(rename = "createTime", default, deserialize_with = "lenient_i64")]
    pub create_time: Option<i64>,
    #[serde(rename = "createTimeISO")]
    pub create_time_iso: Option<String>,
    #[serde(rename = "playCount", default, deserialize_with = "lenient_i64")]
    pub play_count: Option<i64>,
    #[serde(rename = "diggCount", default, deserialize_with = "lenient_i64")]
    pub digg_count: Option<i64>,
    #[serde(rename = "shareCount", default, deserialize_with = "lenient_i64")]
    pub share_count: Option<i64>,
    #[serde(rename = "commentCount", default, deserialize_with = "lenient_i64")]
    pub comment_count: Option<i64>,
    #[serde(rename = "collectCount", default, deserialize_with = "lenient_i64")]
    pub collect_count: Option<i64>,
}

impl TikTokItem {
    /// Publish time, preferring the ISO field over the unix timestamp.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.create_time_iso
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| self.create_time.and_then(|secs| DateTime::from_timestamp(secs, 0)))
    }

    pub fn into_record(self) -> ExternalRecord {
        let created_at = self.published_at();
        ExternalRecord {
            text: self.text.unwrap_or_default(),
            created_at,
            metrics: EngagementMetrics {
                views: counter(self.play_count),
                likes: counter(self.digg_count),
                shares: counter(self.share_count),
                comments: counter(self.comment_count),
                saves: counter(self.collect_count),
            },
        }
    }
}

// --- Instagram ---

/// A single post from the Instagram post scraper dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstagramItem {
    pub caption: Option<String>,
    #[serde(rename = "shortCode")]
    pub short_code: Option<String>,
    pub timestamp: Option<String>,
    #[serde(rename = "videoViewCount", default, deserialize_with = "lenient_i64")]
    pub video_view_count: Option<i64>,
    #[serde(rename = "videoPlayCount", default, deserialize_with = "lenient_i64")]
    pub video_play_count: Option<i64>,
    #[serde(rename = "likesCount", default, deserialize_with = "lenient_i64")]
    pub likes_count: Option<i64>,
    #[serde(rename = "commentsCount", default, deserialize_with = "lenient_i64")]
    pub comments_count: Option<i64>,
}

impl InstagramItem {
    /// Instagram exposes no share or save counts; those stay at zero.
    pub fn into_record(self) -> ExternalRecord {
        let created_at = self.timestamp.as_deref().and_then(parse_timestamp);
        ExternalRecord {
            text: self.caption.unwrap_or_default(),
            created_at,
            metrics: EngagementMetrics {
                views: counter(self.video_play_count.or(self.video_view_count)),
                likes: counter(self.likes_count),
                shares: 0,
                comments: counter(self.comments_count),
                saves: 0,
            },
        }
    }
}

// --- Dataset ---

/// Records decoded from one dataset, plus how many items were unusable.
#[derive(Debug, Clone, Default)]
pub struct DecodedBatch {
    pub records: Vec<ExternalRecord>,
    pub skipped: usize,
}

/// Decode a raw dataset (a JSON array of items) for `platform`.
///
/// Items that are not objects of the expected shape are skipped and
/// counted; a dataset that is not an array at all is rejected.
pub fn decode_dataset(
    platform: Platform,
    dataset: &serde_json::Value,
) -> Result<DecodedBatch, DecodeError> {
    let items = dataset.as_array().ok_or(DecodeError::NotAnArray {
        found: json_kind(dataset),
    })?;

    let mut batch = DecodedBatch {
        records: Vec::with_capacity(items.len()),
        skipped: 0,
    };

    for (index, item) in items.iter().enumerate() {
        match decode_item(platform, item) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                warn!(%platform, index, error = %e, "Skipping undecodable dataset item");
                batch.skipped += 1;
            }
        }
    }

    Ok(batch)
}

/// Parse and decode a dataset from its JSON text.
pub fn decode_dataset_str(platform: Platform, json: &str) -> Result<DecodedBatch, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    decode_dataset(platform, &value)
}

fn decode_item(platform: Platform, item: &serde_json::Value) -> Result<ExternalRecord, DecodeError> {
    let record = match platform {
        Platform::TikTok => TikTokItem::deserialize(item)?.into_record(),
        Platform::Instagram => InstagramItem::deserialize(item)?.into_record(),
    };
    Ok(record)
}

// --- Helpers ---

/// Negative or missing counters become zero.
fn counter(value: Option<i64>) -> u64 {
    value.and_then(|v| u64::try_from(v).ok()).unwrap_or(0)
}

/// RFC 3339 first, then a bare `YYYY-MM-DDTHH:MM:SS` treated as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Accepts an integer, a float with no fractional part, or a numeric
/// string. Anything else decodes as `None` rather than failing the item.
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
