//! Repository for the append-only `patrol_records` table.

use guardpost_core::store::NewPatrolRecord;
use guardpost_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::patrol_record::{checklist_entries, PatrolRecordRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, guard_id, guard_name, checkpoint_id, checkpoint_name, \
    checkpoint_latitude, checkpoint_longitude, latitude, longitude, distance_m, \
    checklist, photo_url, created_at";

/// Insert and range queries for patrol records. There is no update or delete.
pub struct PatrolRecordRepo;

impl PatrolRecordRepo {
    /// Insert a verified record inside the check-in transaction.
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        record: &NewPatrolRecord,
        created_at: Timestamp,
    ) -> Result<PatrolRecordRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO patrol_records (
                guard_id, guard_name, checkpoint_id, checkpoint_name,
                checkpoint_latitude, checkpoint_longitude, latitude, longitude,
                distance_m, checklist, photo_url, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PatrolRecordRow>(&query)
            .bind(record.guard_id)
            .bind(&record.guard_name)
            .bind(record.checkpoint_id)
            .bind(&record.checkpoint_name)
            .bind(record.checkpoint_location.latitude)
            .bind(record.checkpoint_location.longitude)
            .bind(record.position.latitude)
            .bind(record.position.longitude)
            .bind(record.distance_m)
            .bind(Json(checklist_entries(&record.checklist)))
            .bind(&record.photo_url)
            .bind(created_at)
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PatrolRecordRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM patrol_records WHERE id = $1");
        sqlx::query_as::<_, PatrolRecordRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Records created in `[start, end)`, optionally for one guard, ordered by
    /// `created_at` then `id`.
    pub async fn list_between(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
        guard_id: Option<DbId>,
    ) -> Result<Vec<PatrolRecordRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM patrol_records
             WHERE created_at >= $1 AND created_at < $2
               AND ($3::BIGINT IS NULL OR guard_id = $3)
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, PatrolRecordRow>(&query)
            .bind(start)
            .bind(end)
            .bind(guard_id)
            .fetch_all(pool)
            .await
    }
}
