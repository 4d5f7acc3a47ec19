//! Repository for the `guards` table.

use guardpost_core::roles::ROLE_GUARD;
use guardpost_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::guard::{CreateGuard, Guard, UpdateGuard};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, name, password, role, created_at, updated_at";

/// Provides CRUD operations for guards and supervisors.
pub struct GuardRepo;

impl GuardRepo {
    /// Insert a new account with the `guard` role, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateGuard) -> Result<Guard, sqlx::Error> {
        let query = format!(
            "INSERT INTO guards (username, name, password, role)
             VALUES ($1, $2, $3, '{ROLE_GUARD}')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Guard>(&query)
            .bind(&input.username)
            .bind(&input.name)
            .bind(&input.password)
            .fetch_one(pool)
            .await
    }

    /// Find a live account with the `guard` role by ID.
    ///
    /// Supervisors are not reachable through the `/guards` resource.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Guard>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM guards
             WHERE id = $1 AND role = '{ROLE_GUARD}' AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Guard>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a live account by username (used for login).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Guard>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM guards WHERE username = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Guard>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// List live accounts with the `guard` role, ordered by name.
    pub async fn list_guards(pool: &PgPool) -> Result<Vec<Guard>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM guards
             WHERE role = '{ROLE_GUARD}' AND deleted_at IS NULL
             ORDER BY name, id"
        );
        sqlx::query_as::<_, Guard>(&query).fetch_all(pool).await
    }

    /// Update a guard. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live `guard`-role row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGuard,
    ) -> Result<Option<Guard>, sqlx::Error> {
        let query = format!(
            "UPDATE guards SET
                username = COALESCE($2, username),
                name = COALESCE($3, name),
                password = COALESCE($4, password)
             WHERE id = $1 AND role = '{ROLE_GUARD}' AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Guard>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(&input.name)
            .bind(&input.password)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a guard by ID. Returns `true` if a row was marked deleted.
    ///
    /// Supervisor accounts are never matched.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE guards SET deleted_at = NOW()
             WHERE id = $1 AND role = '{ROLE_GUARD}' AND deleted_at IS NULL"
        );
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load a live account inside a check-in transaction, with a share lock.
    pub async fn find_for_check_in(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<Guard>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM guards WHERE id = $1 AND deleted_at IS NULL FOR SHARE"
        );
        sqlx::query_as::<_, Guard>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }
}
