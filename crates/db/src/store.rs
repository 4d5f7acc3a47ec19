//! PostgreSQL-backed [`RecordStore`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use guardpost_core::clock::{Clock, SystemClock};
use guardpost_core::store::{
    utc_day_bounds, validate_candidate_input, verify_candidate, CheckInCandidate, PatrolRecord,
    RecordStore, StoreError,
};
use guardpost_core::types::DbId;

use crate::repositories::{CheckpointRepo, GuardRepo, PatrolRecordRepo};
use crate::DbPool;

/// Authoritative record store.
///
/// Each append runs in one transaction: the checkpoint and guard are read
/// with share locks, the candidate is verified against them, and the record
/// is inserted with a timestamp from the store's clock. A rejected candidate
/// rolls back without writing.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl PgRecordStore {
    pub fn new(pool: DbPool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    pub fn with_clock(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    async fn list(
        &self,
        date: NaiveDate,
        guard_id: Option<DbId>,
    ) -> Result<Vec<PatrolRecord>, StoreError> {
        let (start, end) = utc_day_bounds(date);
        let rows = PatrolRecordRepo::list_between(&self.pool, start, end, guard_id)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(PatrolRecord::from).collect())
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    tracing::error!(error = %err, "Record store query failed");
    StoreError::Backend("database error".to_string())
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn append(&self, candidate: CheckInCandidate) -> Result<PatrolRecord, StoreError> {
        validate_candidate_input(&candidate)?;

        let mut tx = self.pool.begin().await.map_err(backend)?;

        let checkpoint = CheckpointRepo::find_for_check_in(&mut tx, candidate.checkpoint_id)
            .await
            .map_err(backend)?
            .map(|c| c.snapshot());
        let guard = GuardRepo::find_for_check_in(&mut tx, candidate.guard_id)
            .await
            .map_err(backend)?
            .map(|g| g.profile());

        // Dropping `tx` on rejection rolls it back.
        let verified = verify_candidate(&candidate, checkpoint.as_ref(), guard.as_ref())?;

        let row = PatrolRecordRepo::insert(&mut tx, &verified, self.clock.now())
            .await
            .map_err(backend)?;
        tx.commit().await.map_err(backend)?;

        tracing::info!(
            record_id = row.id,
            guard_id = row.guard_id,
            checkpoint_id = row.checkpoint_id,
            distance_m = row.distance_m,
            "Patrol record created"
        );
        Ok(row.into())
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<PatrolRecord>, StoreError> {
        self.list(date, None).await
    }

    async fn list_by_guard_and_date(
        &self,
        guard_id: DbId,
        date: NaiveDate,
    ) -> Result<Vec<PatrolRecord>, StoreError> {
        self.list(date, Some(guard_id)).await
    }
}
