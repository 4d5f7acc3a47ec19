//! Handlers for `/reports`.

use axum::extract::{Query, State};
use axum::Json;
use guardpost_core::report::{summarize_day, DailySummary};
use guardpost_core::store::GuardProfile;
use guardpost_db::repositories::GuardRepo;

use crate::error::AppResult;
use crate::query::{resolve_date, DateParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/reports/daily?date=
///
/// Expected patrols are `active guards * DAILY_PATROL_TARGET`.
pub async fn daily(
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> AppResult<Json<DataResponse<DailySummary>>> {
    let date = resolve_date(params.date, state.clock.as_ref());

    let roster: Vec<GuardProfile> = GuardRepo::list_guards(&state.pool)
        .await?
        .iter()
        .map(|g| g.profile())
        .collect();
    let records = state.records.list_by_date(date).await?;

    let summary = summarize_day(date, &roster, &records, state.config.daily_patrol_target);
    Ok(Json(DataResponse { data: summary }))
}
