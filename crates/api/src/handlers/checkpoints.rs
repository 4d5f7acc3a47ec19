//! Handlers for the `/checkpoints` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use guardpost_core::checkpoint::{normalize_checklist, validate_checkpoint_name, validate_location};
use guardpost_core::error::CoreError;
use guardpost_core::geo::Coordinate;
use guardpost_core::types::DbId;
use guardpost_db::models::checkpoint::{Checkpoint, CreateCheckpoint, UpdateCheckpoint};
use guardpost_db::repositories::CheckpointRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Checkpoint",
        id,
    })
}

/// POST /api/v1/checkpoints
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCheckpoint>,
) -> AppResult<(StatusCode, Json<DataResponse<Checkpoint>>)> {
    input.validate()?;
    validate_checkpoint_name(&input.name)?;
    validate_location(Coordinate::new(input.latitude, input.longitude))?;

    let input = CreateCheckpoint {
        name: input.name.trim().to_string(),
        checklist: normalize_checklist(input.checklist)?,
        ..input
    };
    let checkpoint = CheckpointRepo::create(&state.pool, &input).await?;

    tracing::info!(checkpoint_id = checkpoint.id, name = %checkpoint.name, "Checkpoint created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: checkpoint })))
}

/// GET /api/v1/checkpoints
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Checkpoint>>>> {
    let checkpoints = CheckpointRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: checkpoints }))
}

/// GET /api/v1/checkpoints/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Checkpoint>>> {
    let checkpoint = CheckpointRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: checkpoint }))
}

/// PUT /api/v1/checkpoints/{id}
///
/// Records already written keep the name, position and checklist they were
/// created with.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCheckpoint>,
) -> AppResult<Json<DataResponse<Checkpoint>>> {
    input.validate()?;

    let existing = CheckpointRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(name) = &input.name {
        validate_checkpoint_name(name)?;
    }
    validate_location(Coordinate::new(
        input.latitude.unwrap_or(existing.latitude),
        input.longitude.unwrap_or(existing.longitude),
    ))?;

    let input = UpdateCheckpoint {
        name: input.name.map(|n| n.trim().to_string()),
        checklist: input.checklist.map(normalize_checklist).transpose()?,
        ..input
    };
    let checkpoint = CheckpointRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(checkpoint_id = id, "Checkpoint updated");
    Ok(Json(DataResponse { data: checkpoint }))
}

/// DELETE /api/v1/checkpoints/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if CheckpointRepo::soft_delete(&state.pool, id).await? {
        tracing::info!(checkpoint_id = id, "Checkpoint deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
