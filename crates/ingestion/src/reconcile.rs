//! Reconciliation of canonical warnings against the store.

use tracing::debug;

use alert_common::{AlertResult, Warning};
use storage::{UpsertOutcome, WarningStore};

/// Applies canonical warnings to the store with the two-step matching
/// strategy: stable id first, `(title, start)` fallback second.
pub struct Reconciler<'a> {
    store: &'a dyn WarningStore,
}

impl<'a> Reconciler<'a> {
    pub fn new(store: &'a dyn WarningStore) -> Self {
        Self { store }
    }

    /// Upsert one canonical warning.
    ///
    /// Idempotent: applying the same record twice leaves one stored row,
    /// with only `fetched_at` moving forward.
    pub async fn upsert(&self, record: &Warning) -> AlertResult<UpsertOutcome> {
        if let (Some(start), Some(end)) = (record.start, record.end) {
            // Not enforced, only surfaced
            if start > end {
                debug!(title = %record.title, %start, %end, "Warning window has start after end");
            }
        }

        match record.usable_stable_id() {
            Some(stable_id) => self.store.upsert_by_stable_id(stable_id, record).await,
            None => self.store.upsert_by_fallback(record).await,
        }
    }
}
