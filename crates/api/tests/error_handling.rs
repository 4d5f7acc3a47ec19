//! Tests for `AppError` -> HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server or
//! database is needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use guardpost_api::error::AppError;
use guardpost_core::error::CoreError;
use guardpost_core::store::{Rejection, StoreError};
use http_body_util::BodyExt;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Checkpoint",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Checkpoint with id 42 not found");
    assert!(json.get("details").is_none());
}

#[tokio::test]
async fn unauthorized_error_returns_401() {
    let err = AppError::Core(CoreError::Unauthorized("Invalid username or password".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn out_of_range_returns_422_with_distance() {
    let err = AppError::Store(StoreError::Rejected(Rejection::OutOfRange {
        distance_m: 200.4,
        radius_m: 50.0,
    }));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "OUT_OF_RANGE");
    assert_eq!(
        json["error"],
        "You must be within 50 meters of the checkpoint. Current distance: 200m"
    );
    assert_eq!(json["details"]["distance_m"], 200.4);
    assert_eq!(json["details"]["radius_m"], 50.0);
}

#[tokio::test]
async fn incomplete_checklist_returns_422_with_missing_items() {
    let err = AppError::Store(StoreError::Rejected(Rejection::IncompleteChecklist {
        missing: vec!["Lights off".to_string()],
    }));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "INCOMPLETE_CHECKLIST");
    assert_eq!(json["details"]["missing"], serde_json::json!(["Lights off"]));
}

#[tokio::test]
async fn unknown_references_return_400() {
    let (status, json) = error_to_response(AppError::Store(StoreError::Rejected(
        Rejection::CheckpointNotFound(9),
    )))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "CHECKPOINT_NOT_FOUND");

    let (status, json) = error_to_response(AppError::Store(StoreError::Rejected(
        Rejection::GuardNotFound(9),
    )))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "GUARD_NOT_FOUND");
}

#[tokio::test]
async fn store_backend_error_is_sanitized() {
    let err = AppError::Store(StoreError::Backend("connection refused".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_maps_to_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}
