//! Handlers for the `/guards` resource.
//!
//! Responses never include the stored password.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use guardpost_core::error::CoreError;
use guardpost_core::types::DbId;
use guardpost_db::models::guard::{CreateGuard, GuardResponse, UpdateGuard};
use guardpost_db::repositories::GuardRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Guard", id })
}

/// POST /api/v1/guards
///
/// Always creates a `guard`-role account.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateGuard>,
) -> AppResult<(StatusCode, Json<DataResponse<GuardResponse>>)> {
    input.validate()?;

    let guard = GuardRepo::create(&state.pool, &input).await?;
    tracing::info!(guard_id = guard.id, username = %guard.username, "Guard created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: guard.into() })))
}

/// GET /api/v1/guards
///
/// Lists accounts with the `guard` role only.
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<GuardResponse>>>> {
    let guards = GuardRepo::list_guards(&state.pool).await?;
    Ok(Json(DataResponse {
        data: guards.into_iter().map(GuardResponse::from).collect(),
    }))
}

/// GET /api/v1/guards/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<GuardResponse>>> {
    let guard = GuardRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: guard.into() }))
}

/// PUT /api/v1/guards/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateGuard>,
) -> AppResult<Json<DataResponse<GuardResponse>>> {
    input.validate()?;
    let guard = GuardRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: guard.into() }))
}

/// DELETE /api/v1/guards/{id}
///
/// Soft delete: the guard's patrol records stay attached to them.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if GuardRepo::soft_delete(&state.pool, id).await? {
        tracing::info!(guard_id = id, "Guard deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
