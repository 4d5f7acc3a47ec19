//! Checkpoint snapshots and checklist helpers.
//!
//! A [`CheckpointSnapshot`] is the read-only view of a checkpoint that a
//! check-in session captures at selection time and that record stores use
//! for the authoritative proximity re-check.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geo::Coordinate;
use crate::types::DbId;

/// Maximum length of a checkpoint name or a checklist label.
pub const MAX_LABEL_LEN: usize = 200;

/// Item label -> done flag, in checklist order.
pub type Checklist = IndexMap<String, bool>;

/// Identity, fixed position and checklist of a checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointSnapshot {
    pub id: DbId,
    pub name: String,
    #[serde(flatten)]
    pub location: Coordinate,
    pub checklist: Vec<String>,
}

impl CheckpointSnapshot {
    /// A checklist with every item marked not done.
    pub fn blank_checklist(&self) -> Checklist {
        self.checklist
            .iter()
            .map(|item| (item.clone(), false))
            .collect()
    }
}

/// Labels from `checklist` that are absent from `results` or marked not done.
pub fn unchecked_items<'a>(checklist: &'a [String], results: &Checklist) -> Vec<&'a str> {
    checklist
        .iter()
        .filter(|item| !results.get(item.as_str()).copied().unwrap_or(false))
        .map(String::as_str)
        .collect()
}

/// Trim labels, drop blank ones, and reject duplicates or overlong labels.
///
/// Labels are the identity key for completion tracking, so two labels that
/// only differ by surrounding whitespace count as duplicates.
pub fn normalize_checklist(items: Vec<String>) -> Result<Vec<String>, CoreError> {
    let mut normalized: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let label = item.trim();
        if label.is_empty() {
            continue;
        }
        if label.chars().count() > MAX_LABEL_LEN {
            return Err(CoreError::Validation(format!(
                "Checklist item exceeds {MAX_LABEL_LEN} characters: '{label}'"
            )));
        }
        if normalized.iter().any(|existing| existing == label) {
            return Err(CoreError::Validation(format!(
                "Duplicate checklist item '{label}'"
            )));
        }
        normalized.push(label.to_string());
    }
    Ok(normalized)
}

/// Validate that a checkpoint name is non-blank and within length limits.
pub fn validate_checkpoint_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Checkpoint name must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_LABEL_LEN {
        return Err(CoreError::Validation(format!(
            "Checkpoint name exceeds {MAX_LABEL_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate that a checkpoint position is finite and within WGS-84 ranges.
///
/// Stricter than the proximity engine: a checkpoint is authoritative data, so
/// a typo here would silently make it unreachable.
pub fn validate_location(location: Coordinate) -> Result<(), CoreError> {
    if !location.is_finite() {
        return Err(CoreError::Validation(
            "Checkpoint coordinates must be finite numbers".to_string(),
        ));
    }
    if !(-90.0..=90.0).contains(&location.latitude) {
        return Err(CoreError::Validation(format!(
            "latitude must be between -90 and 90, got {}",
            location.latitude
        )));
    }
    if !(-180.0..=180.0).contains(&location.longitude) {
        return Err(CoreError::Validation(format!(
            "longitude must be between -180 and 180, got {}",
            location.longitude
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn main_entrance() -> CheckpointSnapshot {
        CheckpointSnapshot {
            id: 1,
            name: "Main Entrance".to_string(),
            location: Coordinate::new(40.7128, -74.0060),
            checklist: labels(&["Door locked", "Lights off", "No damage visible"]),
        }
    }

    #[test]
    fn blank_checklist_preserves_order_and_is_all_false() {
        let checklist = main_entrance().blank_checklist();
        let keys: Vec<&str> = checklist.keys().map(String::as_str).collect();
        assert_eq!(keys, ["Door locked", "Lights off", "No damage visible"]);
        assert!(checklist.values().all(|done| !done));
    }

    #[test]
    fn unchecked_items_reports_missing_and_false() {
        let cp = main_entrance();
        let mut results = Checklist::new();
        results.insert("Door locked".to_string(), true);
        results.insert("Lights off".to_string(), false);

        assert_eq!(
            unchecked_items(&cp.checklist, &results),
            ["Lights off", "No damage visible"]
        );
    }

    #[test]
    fn unchecked_items_ignores_extra_labels() {
        let cp = main_entrance();
        let mut results = cp.blank_checklist();
        results.values_mut().for_each(|done| *done = true);
        results.insert("Retired item".to_string(), false);

        assert!(unchecked_items(&cp.checklist, &results).is_empty());
    }

    #[test]
    fn normalize_trims_and_drops_blank_labels() {
        let result = normalize_checklist(labels(&["  Gate locked ", "", "   ", "Fence intact"]));
        assert_eq!(result.unwrap(), ["Gate locked", "Fence intact"]);
    }

    #[test]
    fn normalize_rejects_duplicates_after_trim() {
        let err = normalize_checklist(labels(&["Gate locked", " Gate locked"])).unwrap_err();
        assert!(err.to_string().contains("Duplicate checklist item"));
    }

    #[test]
    fn normalize_rejects_overlong_label() {
        let long = "x".repeat(MAX_LABEL_LEN + 1);
        assert!(normalize_checklist(vec![long]).is_err());
    }

    #[test]
    fn checkpoint_name_validation() {
        assert!(validate_checkpoint_name("Warehouse").is_ok());
        assert!(validate_checkpoint_name("   ").is_err());
        assert!(validate_checkpoint_name(&"y".repeat(MAX_LABEL_LEN + 1)).is_err());
    }

    #[test]
    fn location_validation_checks_ranges() {
        assert!(validate_location(Coordinate::new(40.7128, -74.0060)).is_ok());
        assert!(validate_location(Coordinate::new(90.0, 180.0)).is_ok());
        assert!(validate_location(Coordinate::new(90.5, 0.0)).is_err());
        assert!(validate_location(Coordinate::new(0.0, -180.5)).is_err());
        assert!(validate_location(Coordinate::new(f64::NAN, 0.0)).is_err());
    }

    #[test]
    fn snapshot_serializes_flat_coordinates() {
        let json = serde_json::to_value(main_entrance()).unwrap();
        assert_eq!(json["latitude"], 40.7128);
        assert_eq!(json["longitude"], -74.0060);
        assert_eq!(json["checklist"][0], "Door locked");
    }
}
