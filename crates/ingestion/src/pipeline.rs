//! The fetch → normalize → reconcile pipeline.

use serde_json::Value;
use tracing::{info, warn};

use storage::WarningStore;

use crate::feed::FeedClient;
use crate::normalize::normalize;
use crate::reconcile::Reconciler;

/// Counters for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub inserted: u64,
    pub updated: u64,
    pub failed: u64,
}

/// Reconcile a batch of raw records against the store.
///
/// Each record is normalized and upserted independently; a record that
/// fails either step is counted in `failed` and the batch continues.
pub async fn sync_records(records: Vec<Value>, store: &dyn WarningStore) -> SyncReport {
    let reconciler = Reconciler::new(store);
    let mut report = SyncReport::default();

    for raw in &records {
        let record = match normalize(raw) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Skipping unparsable record");
                report.failed += 1;
                continue;
            }
        };

        match reconciler.upsert(&record).await {
            Ok(outcome) if outcome.created => report.inserted += 1,
            Ok(_) => report.updated += 1,
            Err(e) => {
                warn!(error = %e, title = %record.title, "Record upsert failed");
                report.failed += 1;
            }
        }
    }

    report
}

/// Run one full ingestion cycle: fetch the feed, reconcile every record.
pub async fn run_sync(client: &FeedClient, store: &dyn WarningStore) -> SyncReport {
    let records = client.fetch().await;
    info!(records = records.len(), "Fetched warning feed");

    let report = sync_records(records, store).await;
    info!(
        inserted = report.inserted,
        updated = report.updated,
        failed = report.failed,
        "Ingestion run finished"
    );
    report
}
