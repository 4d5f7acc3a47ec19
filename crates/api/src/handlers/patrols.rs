//! Handlers for the `/patrols` resource.
//!
//! Submission goes through the shared [`RecordStore`], which re-checks
//! proximity against its own copy of the checkpoint.
//!
//! [`RecordStore`]: guardpost_core::store::RecordStore

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use guardpost_core::export::{build_patrol_csv, patrol_csv_filename};
use guardpost_core::store::{CheckInCandidate, PatrolRecord};

use crate::error::AppResult;
use crate::query::{resolve_date, DateParams, PatrolListParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/patrols
pub async fn submit(
    State(state): State<AppState>,
    Json(candidate): Json<CheckInCandidate>,
) -> AppResult<(StatusCode, Json<DataResponse<PatrolRecord>>)> {
    let guard_id = candidate.guard_id;
    let checkpoint_id = candidate.checkpoint_id;

    let record = state.records.append(candidate).await.inspect_err(|err| {
        if let Some(rejection) = err.rejection() {
            tracing::info!(guard_id, checkpoint_id, reason = %rejection, "Check-in rejected");
        }
    })?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// GET /api/v1/patrols?date=&guard_id=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PatrolListParams>,
) -> AppResult<Json<DataResponse<Vec<PatrolRecord>>>> {
    let date = resolve_date(params.date, state.clock.as_ref());
    let records = match params.guard_id {
        Some(guard_id) => state.records.list_by_guard_and_date(guard_id, date).await?,
        None => state.records.list_by_date(date).await?,
    };
    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/patrols/export?date=
///
/// Returns `text/csv` as an attachment named `patrols-<date>.csv`.
pub async fn export_csv(
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> AppResult<impl IntoResponse> {
    let date = resolve_date(params.date, state.clock.as_ref());
    let records = state.records.list_by_date(date).await?;
    let csv = build_patrol_csv(&records);

    let disposition = format!("attachment; filename=\"{}\"", patrol_csv_filename(date));
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
