//! The store trait shared by the ingestion and query sides.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use alert_common::{AlertResult, StoredWarning, Warning};

/// Result of a single upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// True when a new row was created, false when an existing one was
    /// overwritten.
    pub created: bool,
}

/// Durable warning storage.
///
/// Which key to match on is the reconciliation engine's decision; the
/// store only provides the two write primitives. Both refresh
/// `fetched_at` on every successful write, and both must be atomic per
/// key so concurrent ingestion runs cannot lose updates.
#[async_trait]
pub trait WarningStore: Send + Sync {
    /// Insert or fully overwrite the record matched by its stable id.
    async fn upsert_by_stable_id(
        &self,
        stable_id: &str,
        record: &Warning,
    ) -> AlertResult<UpsertOutcome>;

    /// Insert or fully overwrite the record matched by `(title, start)`.
    ///
    /// When several stored rows carry the same pair, the oldest row is the
    /// one overwritten. The pair is not a unique key; this is the
    /// documented fallback for records without a usable stable id.
    async fn upsert_by_fallback(&self, record: &Warning) -> AlertResult<UpsertOutcome>;

    /// Warnings active for a region code at the given instant, ordered by
    /// `start` descending (row id ascending as tie-break).
    ///
    /// A warning without both `start` and `end` is never active.
    async fn active_for(
        &self,
        code: &str,
        as_of: DateTime<Utc>,
    ) -> AlertResult<Vec<StoredWarning>>;

    /// Page through all stored warnings, newest `start` first (nulls
    /// last).
    async fn list(&self, limit: i64, offset: i64) -> AlertResult<Vec<StoredWarning>>;

    /// Total number of stored warnings.
    async fn count(&self) -> AlertResult<i64>;

    /// Fetch a single warning by row id.
    async fn get(&self, id: i64) -> AlertResult<Option<StoredWarning>>;
}
