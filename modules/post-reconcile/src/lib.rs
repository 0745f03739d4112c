//! Reconciliation of scraped social posts against tracked posts.
//!
//! A scraper returns captions, publish times, and engagement counters with
//! no identifier shared with the posts this system tracks. [`reconcile`]
//! decides which tracked post (if any) each scraped record belongs to and
//! emits full-replace metric snapshots for the matches.
//!
//! ```rust,ignore
//! use post_reconcile::{reconcile, ReconcileOptions};
//!
//! let instructions = reconcile(&scraped, &posts, &ReconcileOptions::default())?;
//! store.apply_metrics(account, &instructions).await?;
//! ```

pub mod candidates;
pub mod error;
pub mod options;
pub mod pass;
pub mod resolver;
pub mod similarity;
pub mod types;

pub use candidates::filter_candidates;
pub use error::{ReconcileError, Result};
pub use options::ReconcileOptions;
pub use pass::{reconcile, reconcile_with_report, ReconcileReport, TierCounts};
pub use resolver::resolve;
pub use similarity::similarity;
pub use types::*;
