use thiserror::Error;

use crate::types::PostId;

pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Caller contract violations. Content-level problems (empty captions,
/// missing timestamps, empty pools) are never errors; they resolve to
/// "no match" for the affected record.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Invalid reconcile options: {0}")]
    InvalidOptions(String),

    #[error("Internal post at index {index} has a nil id")]
    NilPostId { index: usize },

    #[error("Internal post id {0} appears more than once in the pool")]
    DuplicatePostId(PostId),
}
