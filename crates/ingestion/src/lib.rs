//! Warning feed ingestion.
//!
//! Fetches raw records from the public warning feed, normalizes them into
//! canonical [`alert_common::Warning`] records, and reconciles them against
//! the durable store. Fetch failures degrade to an empty batch; per-record
//! failures are counted, never fatal for the run.

pub mod error;
pub mod feed;
pub mod normalize;
pub mod pipeline;
pub mod reconcile;

pub use error::{IngestError, Result};
pub use feed::{FeedClient, FeedConfig};
pub use normalize::normalize;
pub use pipeline::{run_sync, sync_records, SyncReport};
pub use reconcile::Reconciler;
