use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use post_reconcile::ReconcileOptions;

pub const ENV_TIME_WINDOW_HOURS: &str = "RECONCILE_TIME_WINDOW_HOURS";
pub const ENV_SIMILARITY_THRESHOLD: &str = "RECONCILE_SIMILARITY_THRESHOLD";
pub const ENV_MIN_DESCRIPTION_LENGTH: &str = "RECONCILE_MIN_DESCRIPTION_LENGTH";

/// TOML-backed sync configuration. Every field has a default, so an empty
/// file (or no `[reconcile]` table) yields the stock tunables.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    #[serde(default)]
    pub reconcile: ReconcileOptions,
}

impl SyncConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SyncConfig = toml::from_str(content).context("Failed to parse sync config")?;
        config.validate()?;
        Ok(config)
    }

    /// Override tunables from `RECONCILE_*` environment variables.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Override tunables from any key lookup. Unset keys leave the current
    /// value in place; a set but unparseable value is an error.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let opts = &mut self.reconcile;
        if let Some(v) = parsed(&lookup, ENV_TIME_WINDOW_HOURS)? {
            opts.candidate_time_window_hours = v;
        }
        if let Some(v) = parsed(&lookup, ENV_SIMILARITY_THRESHOLD)? {
            opts.similarity_threshold = v;
        }
        if let Some(v) = parsed(&lookup, ENV_MIN_DESCRIPTION_LENGTH)? {
            opts.min_description_length = v;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        self.reconcile
            .validate()
            .context("Invalid [reconcile] configuration")
    }
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<SyncConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    SyncConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to load config file: {}", path.display()))
}

fn parsed<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{key} must be a number, got {raw:?}"))
        })
        .transpose()
}
