use chrono::Duration;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{ReconcileError, Result};

pub const DEFAULT_TIME_WINDOW_HOURS: i64 = 48;

/// Bigram similarity at or above which a caption is considered the same post.
/// Deliberately conservative: a false positive overwrites another post's
/// metrics, a false negative only skips one sync cycle.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;

/// Descriptions shorter than this (in chars, after trimming) are not
/// usable as matching keys.
pub const DEFAULT_MIN_DESCRIPTION_LENGTH: usize = 5;

/// Tunables for one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileOptions {
    #[builder(default = DEFAULT_TIME_WINDOW_HOURS)]
    pub candidate_time_window_hours: i64,
    #[builder(default = DEFAULT_SIMILARITY_THRESHOLD)]
    pub similarity_threshold: f64,
    #[builder(default = DEFAULT_MIN_DESCRIPTION_LENGTH)]
    pub min_description_length: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            candidate_time_window_hours: DEFAULT_TIME_WINDOW_HOURS,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            min_description_length: DEFAULT_MIN_DESCRIPTION_LENGTH,
        }
    }
}

impl ReconcileOptions {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ReconcileError::InvalidOptions(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if self.candidate_time_window_hours < 0 {
            return Err(ReconcileError::InvalidOptions(format!(
                "candidate_time_window_hours must not be negative, got {}",
                self.candidate_time_window_hours
            )));
        }
        Ok(())
    }

    pub fn time_window(&self) -> Duration {
        Duration::try_hours(self.candidate_time_window_hours).unwrap_or(Duration::MAX)
    }
}
