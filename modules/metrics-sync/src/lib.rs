//! Caller side of scraped-metrics reconciliation.
//!
//! Decodes scraper datasets into validated records, defines the source and
//! store boundaries, and runs one all-or-nothing sync per account on top of
//! [`post_reconcile`].

pub mod config;
pub mod error;
pub mod scraped;
pub mod store;
pub mod sync;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use config::{load_config, SyncConfig};
pub use error::DecodeError;
pub use scraped::{decode_dataset, decode_dataset_str, DecodedBatch, Platform};
pub use store::{PostStore, ScrapedSource};
pub use sync::{sync_account, SyncSummary};
