//! Check-in session state machine.
//!
//! One [`CheckInSession`] drives a single guard through one attempt at a
//! time:
//!
//! ```text
//! Idle -> Acquiring -> ReadyToFill -> Submitting -> Completed
//!             |             ^             |
//!             |             +-- retry -- SubmitFailed
//!             +-> OutOfRange
//!             +-> LocationUnavailable
//!
//! cancel(): Acquiring | OutOfRange | LocationUnavailable | ReadyToFill
//!           | SubmitFailed -> Cancelled
//! ```
//!
//! The session never touches durable state before `Completed`. Every
//! in-flight operation is stamped with an [`AttemptId`]; a result carrying an
//! older id (the attempt was cancelled or superseded) is discarded.

use std::time::Duration;

use serde::Serialize;

use crate::checkpoint::{unchecked_items, CheckpointSnapshot, Checklist};
use crate::geo::{distance_meters, is_within_radius, whole_meters, CHECK_IN_RADIUS_M};
use crate::position::{acquire_fix, PositionError, PositionFix, PositionSource};
use crate::store::{CheckInCandidate, PatrolRecord, RecordStore, StoreError};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The guard on whose behalf the session runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Actor {
    pub guard_id: DbId,
    pub name: String,
}

/// Identifies one in-flight position request or submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AttemptId(u64);

/// The verified position plus the checklist being filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckInForm {
    pub checkpoint: CheckpointSnapshot,
    pub fix: PositionFix,
    /// Client-side distance; the store measures again on submit.
    pub distance_m: f64,
    pub checklist: Checklist,
}

impl CheckInForm {
    /// Labels still marked not done, in checklist order.
    pub fn unchecked_items(&self) -> Vec<&str> {
        unchecked_items(&self.checkpoint.checklist, &self.checklist)
    }

    pub fn is_complete(&self) -> bool {
        self.checklist.values().all(|done| *done)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Acquiring {
        checkpoint: CheckpointSnapshot,
    },
    LocationUnavailable {
        checkpoint: CheckpointSnapshot,
        #[serde(serialize_with = "serialize_display")]
        reason: PositionError,
    },
    OutOfRange {
        checkpoint: CheckpointSnapshot,
        fix: PositionFix,
        distance_m: f64,
    },
    ReadyToFill {
        form: CheckInForm,
    },
    Submitting {
        form: CheckInForm,
    },
    Completed {
        record: PatrolRecord,
    },
    SubmitFailed {
        form: CheckInForm,
        #[serde(serialize_with = "serialize_display")]
        error: StoreError,
    },
    Cancelled,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Acquiring { .. } => "acquiring",
            SessionState::LocationUnavailable { .. } => "location_unavailable",
            SessionState::OutOfRange { .. } => "out_of_range",
            SessionState::ReadyToFill { .. } => "ready_to_fill",
            SessionState::Submitting { .. } => "submitting",
            SessionState::Completed { .. } => "completed",
            SessionState::SubmitFailed { .. } => "submit_failed",
            SessionState::Cancelled => "cancelled",
        }
    }

    /// The checkpoint the session is working on, if any.
    pub fn checkpoint(&self) -> Option<&CheckpointSnapshot> {
        match self {
            SessionState::Acquiring { checkpoint }
            | SessionState::LocationUnavailable { checkpoint, .. }
            | SessionState::OutOfRange { checkpoint, .. } => Some(checkpoint),
            SessionState::ReadyToFill { form }
            | SessionState::Submitting { form }
            | SessionState::SubmitFailed { form, .. } => Some(&form.checkpoint),
            SessionState::Idle | SessionState::Completed { .. } | SessionState::Cancelled => None,
        }
    }

    /// User-facing guidance for states that need the guard to act.
    ///
    /// Location failures tell the guard to fix their device; proximity
    /// failures tell them to move.
    pub fn guidance(&self) -> Option<String> {
        match self {
            SessionState::LocationUnavailable { reason, .. } => Some(match reason {
                PositionError::Unsupported => {
                    "Geolocation is not supported by this device.".to_string()
                }
                PositionError::TimedOut => {
                    "Timed out waiting for a GPS fix. Move to open sky and try again.".to_string()
                }
                PositionError::PermissionDenied | PositionError::Unavailable(_) => {
                    "Unable to get your location. Please enable location services.".to_string()
                }
            }),
            SessionState::OutOfRange { distance_m, .. } => Some(format!(
                "You are {}m away from the checkpoint. You must be within {} meters to start the patrol.",
                whole_meters(*distance_m),
                whole_meters(CHECK_IN_RADIUS_M)
            )),
            SessionState::ReadyToFill { form } if !form.is_complete() => {
                Some("Please complete all checklist items before submitting.".to_string())
            }
            SessionState::SubmitFailed { error, .. } => Some(error.to_string()),
            _ => None,
        }
    }
}

fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: std::fmt::Display,
    S: serde::Serializer,
{
    serializer.collect_str(value)
}

/// Operations the current state does not allow. None of these change state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    /// A result arrived for an attempt that is no longer current.
    #[error("Discarded result for stale attempt")]
    StaleResult,

    #[error("Unknown checklist item '{0}'")]
    UnknownItem(String),

    #[error(
        "Please complete all checklist items before submitting. Unchecked: {}",
        .unchecked.join(", ")
    )]
    IncompleteChecklist { unchecked: Vec<String> },
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Per-guard, per-attempt check-in workflow.
#[derive(Debug)]
pub struct CheckInSession {
    actor: Actor,
    state: SessionState,
    attempt: u64,
}

impl CheckInSession {
    pub fn new(actor: Actor) -> Self {
        Self {
            actor,
            state: SessionState::Idle,
            attempt: 0,
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The attempt id results must carry to be applied.
    pub fn current_attempt(&self) -> AttemptId {
        AttemptId(self.attempt)
    }

    fn next_attempt(&mut self) -> AttemptId {
        self.attempt += 1;
        AttemptId(self.attempt)
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }

    /// Start an attempt at `checkpoint`, moving to `Acquiring`.
    ///
    /// Allowed from any state. A previous attempt is dropped and any result
    /// still in flight for it will be discarded when it arrives.
    pub fn select_checkpoint(&mut self, checkpoint: CheckpointSnapshot) -> AttemptId {
        let attempt = self.next_attempt();
        self.state = SessionState::Acquiring { checkpoint };
        attempt
    }

    /// Apply the outcome of a position request.
    ///
    /// A fix with a non-finite coordinate counts as no reading at all.
    pub fn resolve_position(
        &mut self,
        attempt: AttemptId,
        outcome: Result<PositionFix, PositionError>,
    ) -> Result<&SessionState, SessionError> {
        if attempt != self.current_attempt() {
            return Err(SessionError::StaleResult);
        }
        let checkpoint = match &self.state {
            SessionState::Acquiring { checkpoint } => checkpoint.clone(),
            _ => return Err(SessionError::StaleResult),
        };

        self.state = match outcome {
            Err(reason) => SessionState::LocationUnavailable { checkpoint, reason },
            Ok(fix) if !fix.coordinate.is_finite() => SessionState::LocationUnavailable {
                checkpoint,
                reason: PositionError::Unavailable(
                    "device reported a non-finite coordinate".to_string(),
                ),
            },
            Ok(fix) => {
                let distance_m = distance_meters(fix.coordinate, checkpoint.location);
                if is_within_radius(distance_m, CHECK_IN_RADIUS_M) {
                    let checklist = checkpoint.blank_checklist();
                    SessionState::ReadyToFill {
                        form: CheckInForm {
                            checkpoint,
                            fix,
                            distance_m,
                            checklist,
                        },
                    }
                } else {
                    SessionState::OutOfRange {
                        checkpoint,
                        fix,
                        distance_m,
                    }
                }
            }
        };
        Ok(&self.state)
    }

    /// Flip one checklist item. No other item is affected.
    pub fn toggle_item(&mut self, label: &str) -> Result<bool, SessionError> {
        let state = self.state.name();
        let SessionState::ReadyToFill { form } = &mut self.state else {
            return Err(SessionError::InvalidTransition {
                action: "toggle a checklist item",
                state,
            });
        };
        let done = form
            .checklist
            .get_mut(label)
            .ok_or_else(|| SessionError::UnknownItem(label.to_string()))?;
        *done = !*done;
        Ok(*done)
    }

    /// Move to `Submitting` and produce the candidate to send to the store.
    ///
    /// Refused with no state change unless every checklist item is done.
    pub fn begin_submit(&mut self) -> Result<(AttemptId, CheckInCandidate), SessionError> {
        let form = match &self.state {
            SessionState::ReadyToFill { form } => form,
            _ => return Err(self.invalid("submit")),
        };
        if !form.is_complete() {
            return Err(SessionError::IncompleteChecklist {
                unchecked: form
                    .unchecked_items()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            });
        }

        let candidate = CheckInCandidate {
            guard_id: self.actor.guard_id,
            checkpoint_id: form.checkpoint.id,
            position: form.fix.coordinate,
            checklist: form.checklist.clone(),
            photo_url: None,
        };
        let form = form.clone();
        let attempt = self.next_attempt();
        self.state = SessionState::Submitting { form };
        Ok((attempt, candidate))
    }

    /// Apply the store's answer to a submission.
    pub fn resolve_submit(
        &mut self,
        attempt: AttemptId,
        outcome: Result<PatrolRecord, StoreError>,
    ) -> Result<&SessionState, SessionError> {
        if attempt != self.current_attempt() {
            return Err(SessionError::StaleResult);
        }
        let form = match &self.state {
            SessionState::Submitting { form } => form.clone(),
            _ => return Err(SessionError::StaleResult),
        };

        self.state = match outcome {
            Ok(record) => SessionState::Completed { record },
            Err(error) => SessionState::SubmitFailed { form, error },
        };
        Ok(&self.state)
    }

    /// Return to the filled-in form after a failed submit, keeping the
    /// position already acquired.
    pub fn retry(&mut self) -> Result<&SessionState, SessionError> {
        let form = match &self.state {
            SessionState::SubmitFailed { form, .. } => form.clone(),
            _ => return Err(self.invalid("retry")),
        };
        self.state = SessionState::ReadyToFill { form };
        Ok(&self.state)
    }

    /// Abandon the attempt. Results still in flight will be discarded.
    ///
    /// Not allowed while submitting: the write may already be durable.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Acquiring { .. }
            | SessionState::LocationUnavailable { .. }
            | SessionState::OutOfRange { .. }
            | SessionState::ReadyToFill { .. }
            | SessionState::SubmitFailed { .. } => {
                self.next_attempt();
                self.state = SessionState::Cancelled;
                Ok(())
            }
            _ => Err(self.invalid("cancel")),
        }
    }

    /// Go back to `Idle` from anything but `Submitting`.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if matches!(self.state, SessionState::Submitting { .. }) {
            return Err(self.invalid("reset"));
        }
        self.next_attempt();
        self.state = SessionState::Idle;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Async drivers
    // -----------------------------------------------------------------------

    /// Request a fresh fix from `source` (bounded by `timeout`) and apply it.
    ///
    /// Holding `&mut self` for the whole request keeps one position request
    /// in flight per session.
    pub async fn acquire_position(
        &mut self,
        source: &dyn PositionSource,
        timeout: Duration,
    ) -> Result<&SessionState, SessionError> {
        if !matches!(self.state, SessionState::Acquiring { .. }) {
            return Err(self.invalid("acquire a position"));
        }
        let attempt = self.current_attempt();
        let outcome = acquire_fix(source, timeout).await;
        self.resolve_position(attempt, outcome)
    }

    /// Submit the completed checklist to `store` and apply its answer.
    pub async fn submit(&mut self, store: &dyn RecordStore) -> Result<&SessionState, SessionError> {
        let (attempt, candidate) = self.begin_submit()?;
        let outcome = store.append(candidate).await;
        self.resolve_submit(attempt, outcome)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
