//! Record store collaborator: the trust boundary for check-ins.
//!
//! Every [`RecordStore`] implementation re-runs the proximity check against
//! its own copy of the checkpoint through [`verify_candidate`]. A client's
//! claim of being in range is never taken as proof.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::checkpoint::{unchecked_items, CheckpointSnapshot, Checklist};
use crate::geo::{distance_meters, is_within_radius, Coordinate, CHECK_IN_RADIUS_M};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The store's view of the actor attached to a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardProfile {
    pub id: DbId,
    pub name: String,
}

/// A check-in as submitted by a client. Nothing in it is trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInCandidate {
    pub guard_id: DbId,
    pub checkpoint_id: DbId,
    #[serde(flatten)]
    pub position: Coordinate,
    pub checklist: Checklist,
    /// Link to a photo taken at the checkpoint, if the device attached one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// A verified check-in awaiting its id and timestamp from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPatrolRecord {
    pub guard_id: DbId,
    pub guard_name: String,
    pub checkpoint_id: DbId,
    pub checkpoint_name: String,
    pub checkpoint_location: Coordinate,
    pub position: Coordinate,
    pub distance_m: f64,
    pub checklist: Checklist,
    pub photo_url: Option<String>,
}

impl NewPatrolRecord {
    pub fn into_record(self, id: DbId, created_at: Timestamp) -> PatrolRecord {
        PatrolRecord {
            id,
            guard_id: self.guard_id,
            guard_name: self.guard_name,
            checkpoint_id: self.checkpoint_id,
            checkpoint_name: self.checkpoint_name,
            checkpoint_latitude: self.checkpoint_location.latitude,
            checkpoint_longitude: self.checkpoint_location.longitude,
            latitude: self.position.latitude,
            longitude: self.position.longitude,
            distance_m: self.distance_m,
            checklist: self.checklist,
            photo_url: self.photo_url,
            created_at,
        }
    }
}

/// Immutable proof of a visit.
///
/// Names and the checkpoint position are copied in at write time, so later
/// edits or deletion of the checkpoint or guard never change the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatrolRecord {
    pub id: DbId,
    pub guard_id: DbId,
    pub guard_name: String,
    pub checkpoint_id: DbId,
    pub checkpoint_name: String,
    pub checkpoint_latitude: f64,
    pub checkpoint_longitude: f64,
    /// Reported position.
    pub latitude: f64,
    pub longitude: f64,
    /// Distance measured by the store, not by the client.
    pub distance_m: f64,
    pub checklist: Checklist,
    /// Stored as given; never fetched or checked.
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Assigned by the store's clock.
    pub created_at: Timestamp,
}


// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a store refused to create a record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("Reported coordinates must be finite numbers")]
    InvalidCoordinate,

    #[error("Checkpoint {0} not found")]
    CheckpointNotFound(DbId),

    #[error("Guard {0} not found")]
    GuardNotFound(DbId),

    #[error(
        "All checklist items must be completed before submitting. Missing: {}",
        .missing.join(", ")
    )]
    IncompleteChecklist { missing: Vec<String> },

    #[error(
        "You must be within {} meters of the checkpoint. Current distance: {}m",
        .radius_m.round(),
        .distance_m.round()
    )]
    OutOfRange { distance_m: f64, radius_m: f64 },
}

/// Errors surfaced by a [`RecordStore`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The candidate failed validation or the proximity re-check.
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// The store itself failed (connection lost, I/O, malformed response).
    #[error("Record store unavailable: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            StoreError::Rejected(rejection) => Some(rejection),
            StoreError::Backend(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Durable, append-only store of patrol records.
///
/// `append` must be atomic with respect to other appends: verification and
/// insertion of one candidate are never interleaved with another's in a way
/// that corrupts a record. Listings are ordered by `created_at` then `id`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Verify `candidate` against the store's own data and persist it.
    async fn append(&self, candidate: CheckInCandidate) -> Result<PatrolRecord, StoreError>;

    /// All records created on the given UTC day.
    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<PatrolRecord>, StoreError>;

    /// Records of one guard created on the given UTC day.
    async fn list_by_guard_and_date(
        &self,
        guard_id: DbId,
        date: NaiveDate,
    ) -> Result<Vec<PatrolRecord>, StoreError>;
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Input checks that need no stored data. Runs before any lookup or
/// distance computation.
pub fn validate_candidate_input(candidate: &CheckInCandidate) -> Result<(), Rejection> {
    if !candidate.position.is_finite() {
        return Err(Rejection::InvalidCoordinate);
    }
    Ok(())
}

/// Authoritative verification of a candidate against the store's own copy
/// of the checkpoint and guard.
///
/// Checks run in order: input, checkpoint, guard, checklist completeness,
/// proximity. The checklist must contain every label the checkpoint has now
/// with a `true` value; extra labels from an older snapshot are kept as
/// submitted.
pub fn verify_candidate(
    candidate: &CheckInCandidate,
    checkpoint: Option<&CheckpointSnapshot>,
    guard: Option<&GuardProfile>,
) -> Result<NewPatrolRecord, Rejection> {
    validate_candidate_input(candidate)?;

    let checkpoint = checkpoint.ok_or(Rejection::CheckpointNotFound(candidate.checkpoint_id))?;
    let guard = guard.ok_or(Rejection::GuardNotFound(candidate.guard_id))?;

    let missing = unchecked_items(&checkpoint.checklist, &candidate.checklist);
    if !missing.is_empty() {
        return Err(Rejection::IncompleteChecklist {
            missing: missing.into_iter().map(str::to_string).collect(),
        });
    }
    if let Some((label, _)) = candidate.checklist.iter().find(|(_, done)| !**done) {
        return Err(Rejection::IncompleteChecklist {
            missing: vec![label.clone()],
        });
    }

    let distance_m = distance_meters(candidate.position, checkpoint.location);
    if !is_within_radius(distance_m, CHECK_IN_RADIUS_M) {
        return Err(Rejection::OutOfRange {
            distance_m,
            radius_m: CHECK_IN_RADIUS_M,
        });
    }

    Ok(NewPatrolRecord {
        guard_id: guard.id,
        guard_name: guard.name.clone(),
        checkpoint_id: checkpoint.id,
        checkpoint_name: checkpoint.name.clone(),
        checkpoint_location: checkpoint.location,
        position: candidate.position,
        distance_m,
        checklist: candidate.checklist.clone(),
        photo_url: candidate.photo_url.clone(),
    })
}

/// Half-open `[start, end)` bounds of a UTC calendar day.
pub fn utc_day_bounds(date: NaiveDate) -> (Timestamp, Timestamp) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
