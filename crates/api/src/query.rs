//! Shared query parameter types for API handlers.

use chrono::NaiveDate;
use guardpost_core::clock::Clock;
use guardpost_core::types::DbId;
use serde::Deserialize;

/// `?date=YYYY-MM-DD`. Omitted means the current UTC day.
#[derive(Debug, Deserialize)]
pub struct DateParams {
    pub date: Option<NaiveDate>,
}

/// `?date=YYYY-MM-DD&guard_id=N` for patrol listings.
#[derive(Debug, Deserialize)]
pub struct PatrolListParams {
    pub date: Option<NaiveDate>,
    pub guard_id: Option<DbId>,
}

/// The requested day, falling back to today (UTC) on `clock`.
pub fn resolve_date(date: Option<NaiveDate>, clock: &dyn Clock) -> NaiveDate {
    date.unwrap_or_else(|| clock.now().date_naive())
}
