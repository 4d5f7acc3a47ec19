//! Checkpoint entity model and DTOs.

use guardpost_core::checkpoint::CheckpointSnapshot;
use guardpost_core::geo::Coordinate;
use guardpost_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A checkpoint row from the `checkpoints` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Checkpoint {
    pub id: DbId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub checklist: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Checkpoint {
    pub fn location(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// The view of this checkpoint used by sessions and the proximity re-check.
    pub fn snapshot(&self) -> CheckpointSnapshot {
        CheckpointSnapshot {
            id: self.id,
            name: self.name.clone(),
            location: self.location(),
            checklist: self.checklist.clone(),
        }
    }
}

/// DTO for creating a new checkpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCheckpoint {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[serde(default)]
    pub checklist: Vec<String>,
}

/// DTO for updating an existing checkpoint. All fields are optional.
///
/// A present `checklist` replaces the whole list.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCheckpoint {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub checklist: Option<Vec<String>>,
}
