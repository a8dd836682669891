//! In-memory store mirroring the PostgreSQL semantics.
//!
//! Backs unit tests and ephemeral runs. Observable behavior (matching,
//! overwrite-in-place, ordering, fetched_at refresh) matches
//! [`crate::WarningCatalog`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use alert_common::{AlertResult, StoredWarning, Warning};

use crate::store::{UpsertOutcome, WarningStore};

#[derive(Default)]
struct Inner {
    next_id: i64,
    rows: Vec<StoredWarning>,
}

/// Mutex-guarded in-memory warning store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Inner {
    fn insert(&mut self, record: &Warning) -> i64 {
        self.next_id += 1;
        self.rows.push(StoredWarning {
            id: self.next_id,
            record: record.clone(),
            fetched_at: Utc::now(),
        });
        self.next_id
    }

    fn overwrite(&mut self, index: usize, record: &Warning) {
        let row = &mut self.rows[index];
        row.record = record.clone();
        row.fetched_at = Utc::now();
    }
}

#[async_trait]
impl WarningStore for MemoryStore {
    async fn upsert_by_stable_id(
        &self,
        stable_id: &str,
        record: &Warning,
    ) -> AlertResult<UpsertOutcome> {
        let mut inner = self.inner.lock().await;
        let existing = inner
            .rows
            .iter()
            .position(|row| row.record.stable_id.as_deref() == Some(stable_id));

        match existing {
            Some(index) => {
                inner.overwrite(index, record);
                Ok(UpsertOutcome { created: false })
            }
            None => {
                inner.insert(record);
                Ok(UpsertOutcome { created: true })
            }
        }
    }

    async fn upsert_by_fallback(&self, record: &Warning) -> AlertResult<UpsertOutcome> {
        let mut inner = self.inner.lock().await;
        let existing = inner
            .rows
            .iter()
            .position(|row| row.record.title == record.title && row.record.start == record.start);

        match existing {
            Some(index) => {
                inner.overwrite(index, record);
                Ok(UpsertOutcome { created: false })
            }
            None => {
                inner.insert(record);
                Ok(UpsertOutcome { created: true })
            }
        }
    }

    async fn active_for(
        &self,
        code: &str,
        as_of: DateTime<Utc>,
    ) -> AlertResult<Vec<StoredWarning>> {
        let inner = self.inner.lock().await;
        let mut active: Vec<StoredWarning> = inner
            .rows
            .iter()
            .filter(|row| {
                let record = &row.record;
                record.area_codes.iter().any(|c| c == code)
                    && matches!((record.start, record.end), (Some(start), Some(end))
                        if start <= as_of && as_of <= end)
            })
            .cloned()
            .collect();

        active.sort_by(|a, b| {
            b.record
                .start
                .cmp(&a.record.start)
                .then(a.id.cmp(&b.id))
        });
        Ok(active)
    }

    async fn list(&self, limit: i64, offset: i64) -> AlertResult<Vec<StoredWarning>> {
        let inner = self.inner.lock().await;
        let mut rows = inner.rows.clone();

        // start descending with nulls last, then id ascending
        rows.sort_by(|a, b| match (b.record.start, a.record.start) {
            (Some(b_start), Some(a_start)) => b_start.cmp(&a_start).then(a.id.cmp(&b.id)),
            (None, None) => a.id.cmp(&b.id),
            (Some(_), None) => std::cmp::Ordering::Greater,
            (None, Some(_)) => std::cmp::Ordering::Less,
        });

        Ok(rows
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self) -> AlertResult<i64> {
        Ok(self.inner.lock().await.rows.len() as i64)
    }

    async fn get(&self, id: i64) -> AlertResult<Option<StoredWarning>> {
        let inner = self.inner.lock().await;
        Ok(inner.rows.iter().find(|row| row.id == id).cloned())
    }
}
