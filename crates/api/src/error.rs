use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use guardpost_core::error::CoreError;
use guardpost_core::store::{Rejection, StoreError};
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses of
/// the form `{ "error": ..., "code": ..., "details"?: ... }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `guardpost_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A check-in rejected or failed by the record store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Request body failed declarative validation.
    #[error(transparent)]
    Validation(#[from] validator::ValidationErrors),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details: Option<Value> = None;

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
            },

            // --- Record store ---
            AppError::Store(StoreError::Rejected(rejection)) => {
                details = rejection_details(rejection);
                let (status, code) = classify_rejection(rejection);
                (status, code, rejection.to_string())
            }
            AppError::Store(StoreError::Backend(msg)) => {
                tracing::error!(error = %msg, "Record store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }

            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                errors.to_string(),
            ),

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Map a store rejection to an HTTP status and error code.
///
/// Unknown references and malformed input are 400; a well-formed check-in
/// that fails a business rule (checklist, proximity) is 422.
fn classify_rejection(rejection: &Rejection) -> (StatusCode, &'static str) {
    match rejection {
        Rejection::InvalidCoordinate => (StatusCode::BAD_REQUEST, "INVALID_COORDINATE"),
        Rejection::CheckpointNotFound(_) => (StatusCode::BAD_REQUEST, "CHECKPOINT_NOT_FOUND"),
        Rejection::GuardNotFound(_) => (StatusCode::BAD_REQUEST, "GUARD_NOT_FOUND"),
        Rejection::IncompleteChecklist { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "INCOMPLETE_CHECKLIST")
        }
        Rejection::OutOfRange { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "OUT_OF_RANGE"),
    }
}

fn rejection_details(rejection: &Rejection) -> Option<Value> {
    match rejection {
        Rejection::IncompleteChecklist { missing } => Some(json!({ "missing": missing })),
        Rejection::OutOfRange {
            distance_m,
            radius_m,
        } => Some(json!({ "distance_m": distance_m, "radius_m": radius_m })),
        _ => None,
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
