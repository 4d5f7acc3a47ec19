//! Same-day completion summary for the supervisor dashboard.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::store::{GuardProfile, PatrolRecord};
use crate::types::DbId;

/// Patrols each active guard is expected to complete per day.
pub const DEFAULT_DAILY_PATROL_TARGET: u32 = 5;

/// One guard's progress towards the daily target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardProgress {
    pub guard_id: DbId,
    pub name: String,
    pub completed: u32,
    pub remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub target_per_guard: u32,
    pub active_guards: u32,
    pub completed: u32,
    pub expected: u32,
    pub missed: u32,
    /// Whole percent of `expected` that was completed; 0 when nothing was
    /// expected. Can exceed 100.
    pub completion_rate: u32,
    pub guards: Vec<GuardProgress>,
}

/// Summarize one day's records against the roster of active guards.
///
/// Records from guards no longer on the roster still count towards
/// `completed`. `guards` keeps the roster's order.
pub fn summarize_day(
    date: NaiveDate,
    roster: &[GuardProfile],
    records: &[PatrolRecord],
    target_per_guard: u32,
) -> DailySummary {
    let mut per_guard: HashMap<DbId, u32> = HashMap::new();
    for record in records {
        *per_guard.entry(record.guard_id).or_default() += 1;
    }

    let guards: Vec<GuardProgress> = roster
        .iter()
        .map(|guard| {
            let completed = per_guard.get(&guard.id).copied().unwrap_or(0);
            GuardProgress {
                guard_id: guard.id,
                name: guard.name.clone(),
                completed,
                remaining: target_per_guard.saturating_sub(completed),
            }
        })
        .collect();

    let active_guards = u32::try_from(roster.len()).unwrap_or(u32::MAX);
    let completed = u32::try_from(records.len()).unwrap_or(u32::MAX);
    // The target is unbounded configuration input.
    let expected = active_guards.saturating_mul(target_per_guard);
    let completion_rate = if expected == 0 {
        0
    } else {
        // `as` saturates on float-to-int conversion.
        (f64::from(completed) / f64::from(expected) * 100.0).round() as u32
    };

    DailySummary {
        date,
        target_per_guard,
        active_guards,
        completed,
        expected,
        missed: expected.saturating_sub(completed),
        completion_rate,
        guards,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn roster() -> Vec<GuardProfile> {
        vec![
            GuardProfile {
                id: 2,
                name: "John Smith".to_string(),
            },
            GuardProfile {
                id: 3,
                name: "Jane Doe".to_string(),
            },
        ]
    }

    fn record(id: DbId, guard_id: DbId) -> PatrolRecord {
        PatrolRecord {
            id,
            guard_id,
            guard_name: String::new(),
            checkpoint_id: 1,
            checkpoint_name: "Main Entrance".to_string(),
            checkpoint_latitude: 40.7128,
            checkpoint_longitude: -74.0060,
            latitude: 40.7128,
            longitude: -74.0060,
            distance_m: 0.0,
            checklist: Default::default(),
            photo_url: None,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn counts_expected_missed_and_rate() {
        let records = vec![record(1, 2), record(2, 2), record(3, 3)];
        let summary = summarize_day(day(), &roster(), &records, DEFAULT_DAILY_PATROL_TARGET);

        assert_eq!(summary.active_guards, 2);
        assert_eq!(summary.expected, 10);
        assert_eq!(summary.completed, 3);
        assert_eq!(summary.missed, 7);
        assert_eq!(summary.completion_rate, 30);
        assert_eq!(
            summary.guards[0],
            GuardProgress {
                guard_id: 2,
                name: "John Smith".to_string(),
                completed: 2,
                remaining: 3,
            }
        );
        assert_eq!(summary.guards[1].remaining, 4);
    }

    #[test]
    fn no_guards_means_zero_rate() {
        let summary = summarize_day(day(), &[], &[], DEFAULT_DAILY_PATROL_TARGET);
        assert_eq!(summary.expected, 0);
        assert_eq!(summary.missed, 0);
        assert_eq!(summary.completion_rate, 0);
    }

    #[test]
    fn huge_target_saturates_instead_of_overflowing() {
        let records = vec![record(1, 2)];
        let summary = summarize_day(day(), &roster(), &records, 3_000_000_000);

        assert_eq!(summary.expected, u32::MAX);
        assert_eq!(summary.missed, u32::MAX - 1);
        assert_eq!(summary.completion_rate, 0);
        assert_eq!(summary.guards[0].remaining, 2_999_999_999);
    }

    #[test]
    fn overachievement_never_goes_negative() {
        let records: Vec<PatrolRecord> = (1..=7).map(|id| record(id, 2)).collect();
        let summary = summarize_day(day(), &roster()[..1], &records, DEFAULT_DAILY_PATROL_TARGET);

        assert_eq!(summary.missed, 0);
        assert_eq!(summary.completion_rate, 140);
        assert_eq!(summary.guards[0].remaining, 0);
    }
}
