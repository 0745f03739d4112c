use thiserror::Error;

/// A scraped dataset that cannot be decoded at all.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Dataset must be a JSON array, got {found}")]
    NotAnArray { found: &'static str },

    #[error("Invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
}
