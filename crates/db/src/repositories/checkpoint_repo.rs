//! Repository for the `checkpoints` table.

use guardpost_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::checkpoint::{Checkpoint, CreateCheckpoint, UpdateCheckpoint};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, latitude, longitude, checklist, created_at, updated_at";

/// Provides CRUD operations for checkpoints.
pub struct CheckpointRepo;

impl CheckpointRepo {
    /// Insert a new checkpoint, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCheckpoint,
    ) -> Result<Checkpoint, sqlx::Error> {
        let query = format!(
            "INSERT INTO checkpoints (name, latitude, longitude, checklist)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Checkpoint>(&query)
            .bind(&input.name)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.checklist)
            .fetch_one(pool)
            .await
    }

    /// Find a checkpoint by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Checkpoint>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM checkpoints WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Checkpoint>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List live checkpoints in creation order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Checkpoint>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM checkpoints WHERE deleted_at IS NULL ORDER BY id");
        sqlx::query_as::<_, Checkpoint>(&query).fetch_all(pool).await
    }

    /// Update a checkpoint. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCheckpoint,
    ) -> Result<Option<Checkpoint>, sqlx::Error> {
        let query = format!(
            "UPDATE checkpoints SET
                name = COALESCE($2, name),
                latitude = COALESCE($3, latitude),
                longitude = COALESCE($4, longitude),
                checklist = COALESCE($5, checklist)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Checkpoint>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.checklist)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a checkpoint by ID. Returns `true` if a row was marked deleted.
    ///
    /// Patrol records referencing the checkpoint are left as they are.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE checkpoints SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load a live checkpoint inside a check-in transaction.
    ///
    /// Takes a share lock so a concurrent edit or delete waits until the
    /// check-in has been verified and written against this version.
    pub async fn find_for_check_in(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<Checkpoint>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM checkpoints WHERE id = $1 AND deleted_at IS NULL FOR SHARE"
        );
        sqlx::query_as::<_, Checkpoint>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }
}
