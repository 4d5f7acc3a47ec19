//! Handlers for the `/auth` resource.
//!
//! Login checks the stored credential and returns the account profile. No
//! session token is issued.

use axum::extract::State;
use axum::Json;
use guardpost_core::error::CoreError;
use guardpost_db::models::guard::GuardResponse;
use guardpost_db::repositories::GuardRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<GuardResponse>>> {
    let invalid = || {
        AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        ))
    };

    let guard = GuardRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(invalid)?;
    if guard.password != input.password {
        tracing::info!(username = %input.username, "Rejected login");
        return Err(invalid());
    }

    tracing::info!(guard_id = guard.id, role = %guard.role, "Login succeeded");
    Ok(Json(DataResponse { data: guard.into() }))
}
