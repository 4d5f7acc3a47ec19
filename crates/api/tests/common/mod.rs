#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::{TimeZone, Utc};
use guardpost_core::clock::ManualClock;
use guardpost_core::types::Timestamp;
use guardpost_db::PgRecordStore;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use guardpost_api::config::ServerConfig;
use guardpost_api::router::build_app_router;
use guardpost_api::state::AppState;

/// The instant every test app's clock is frozen at.
pub fn test_now() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        daily_patrol_target: 5,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and a clock frozen at [`test_now`].
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let clock = Arc::new(ManualClock::new(test_now()));

    let state = AppState {
        records: Arc::new(PgRecordStore::with_clock(pool.clone(), clock.clone())),
        pool,
        config: Arc::new(config.clone()),
        clock,
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(json)).await
}

pub async fn put_json(app: Router, uri: &str, json: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, Some(json)).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create the "Main Entrance" checkpoint at (40.7128, -74.0060) and return its id.
pub async fn create_main_entrance(pool: &PgPool) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/checkpoints",
        serde_json::json!({
            "name": "Main Entrance",
            "latitude": 40.7128,
            "longitude": -74.0060,
            "checklist": ["Door locked", "Lights off", "No damage visible"]
        }),
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a guard account and return its id.
pub async fn create_guard(pool: &PgPool, username: &str, name: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/guards",
        serde_json::json!({ "username": username, "name": name, "password": "guard123" }),
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
