//! Patrol record row and its conversion to the domain record.
//!
//! There are no create/update DTOs: rows are only ever inserted from a
//! verified [`NewPatrolRecord`](guardpost_core::store::NewPatrolRecord) and
//! the table rejects updates.

use guardpost_core::checkpoint::Checklist;
use guardpost_core::store::PatrolRecord;
use guardpost_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// One checklist result as stored in the `checklist` JSONB array.
///
/// An array of objects keeps the item order, which a JSONB object would not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistEntry {
    pub item: String,
    pub done: bool,
}

pub fn checklist_entries(checklist: &Checklist) -> Vec<ChecklistEntry> {
    checklist
        .iter()
        .map(|(item, done)| ChecklistEntry {
            item: item.clone(),
            done: *done,
        })
        .collect()
}

/// A row from the `patrol_records` table.
#[derive(Debug, Clone, FromRow)]
pub struct PatrolRecordRow {
    pub id: DbId,
    pub guard_id: DbId,
    pub guard_name: String,
    pub checkpoint_id: DbId,
    pub checkpoint_name: String,
    pub checkpoint_latitude: f64,
    pub checkpoint_longitude: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_m: f64,
    pub checklist: Json<Vec<ChecklistEntry>>,
    pub photo_url: Option<String>,
    pub created_at: Timestamp,
}

impl From<PatrolRecordRow> for PatrolRecord {
    fn from(row: PatrolRecordRow) -> Self {
        PatrolRecord {
            id: row.id,
            guard_id: row.guard_id,
            guard_name: row.guard_name,
            checkpoint_id: row.checkpoint_id,
            checkpoint_name: row.checkpoint_name,
            checkpoint_latitude: row.checkpoint_latitude,
            checkpoint_longitude: row.checkpoint_longitude,
            latitude: row.latitude,
            longitude: row.longitude,
            distance_m: row.distance_m,
            checklist: row
                .checklist
                .0
                .into_iter()
                .map(|entry| (entry.item, entry.done))
                .collect(),
            photo_url: row.photo_url,
            created_at: row.created_at,
        }
    }
}
