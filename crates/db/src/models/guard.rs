//! Guard entity model and DTOs.

use guardpost_core::store::GuardProfile;
use guardpost_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full guard row from the `guards` table.
///
/// Contains the password -- NEVER serialize this to API responses directly.
/// Use [`GuardResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Guard {
    pub id: DbId,
    pub username: String,
    pub name: String,
    pub password: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Guard {
    /// The actor attached to records this guard creates.
    pub fn profile(&self) -> GuardProfile {
        GuardProfile {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Safe guard representation for API responses (no password).
#[derive(Debug, Clone, Serialize)]
pub struct GuardResponse {
    pub id: DbId,
    pub username: String,
    pub name: String,
    pub role: String,
    pub created_at: Timestamp,
}

impl From<Guard> for GuardResponse {
    fn from(guard: Guard) -> Self {
        Self {
            id: guard.id,
            username: guard.username,
            name: guard.name,
            role: guard.role,
            created_at: guard.created_at,
        }
    }
}

/// DTO for creating a new guard. Accounts created this way always get the
/// `guard` role; any `role` in the request body is ignored.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGuard {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// DTO for updating an existing guard. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateGuard {
    #[validate(length(min = 1, max = 100))]
    pub username: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub password: Option<String>,
}
