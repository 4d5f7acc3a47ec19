//! In-process [`RecordStore`] implementation.
//!
//! Holds its own directory of checkpoints and guards next to the records,
//! all behind one async mutex, so verify-then-insert is atomic per append.
//! Used by tests and by embedders that do not need durability across
//! restarts.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::checkpoint::CheckpointSnapshot;
use crate::clock::Clock;
use crate::store::{
    utc_day_bounds, verify_candidate, CheckInCandidate, GuardProfile, PatrolRecord, RecordStore,
    StoreError,
};
use crate::types::DbId;

#[derive(Default)]
struct Inner {
    checkpoints: HashMap<DbId, CheckpointSnapshot>,
    guards: HashMap<DbId, GuardProfile>,
    records: Vec<PatrolRecord>,
    last_id: DbId,
}

/// Memory-backed record store with an injectable clock.
pub struct MemoryRecordStore {
    clock: Arc<dyn Clock>,
    inner: Mutex<Inner>,
}

impl MemoryRecordStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Insert or replace a checkpoint in the store's directory.
    pub async fn put_checkpoint(&self, checkpoint: CheckpointSnapshot) {
        self.inner
            .lock()
            .await
            .checkpoints
            .insert(checkpoint.id, checkpoint);
    }

    /// Remove a checkpoint. Records that reference it are left untouched.
    pub async fn remove_checkpoint(&self, id: DbId) -> bool {
        self.inner.lock().await.checkpoints.remove(&id).is_some()
    }

    pub async fn put_guard(&self, guard: GuardProfile) {
        self.inner.lock().await.guards.insert(guard.id, guard);
    }

    /// Number of records ever appended.
    pub async fn record_count(&self) -> usize {
        self.inner.lock().await.records.len()
    }

    async fn list_where<F>(&self, date: NaiveDate, keep: F) -> Vec<PatrolRecord>
    where
        F: Fn(&PatrolRecord) -> bool,
    {
        let (start, end) = utc_day_bounds(date);
        let inner = self.inner.lock().await;
        let mut records: Vec<PatrolRecord> = inner
            .records
            .iter()
            .filter(|r| r.created_at >= start && r.created_at < end && keep(r))
            .cloned()
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        records
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn append(&self, candidate: CheckInCandidate) -> Result<PatrolRecord, StoreError> {
        let mut inner = self.inner.lock().await;

        let verified = verify_candidate(
            &candidate,
            inner.checkpoints.get(&candidate.checkpoint_id),
            inner.guards.get(&candidate.guard_id),
        )?;

        inner.last_id += 1;
        let record = verified.into_record(inner.last_id, self.clock.now());
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<PatrolRecord>, StoreError> {
        Ok(self.list_where(date, |_| true).await)
    }

    async fn list_by_guard_and_date(
        &self,
        guard_id: DbId,
        date: NaiveDate,
    ) -> Result<Vec<PatrolRecord>, StoreError> {
        Ok(self.list_where(date, |r| r.guard_id == guard_id).await)
    }
}
