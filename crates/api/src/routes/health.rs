//! Liveness endpoint, mounted at the root rather than under `/api/v1`.
//!
//! Besides database reachability it reports the check-in policy and the
//! server's clock, so a guard device can tell how far its own clock is off
//! before it starts a check-in.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use guardpost_core::geo::CHECK_IN_RADIUS_M;
use guardpost_core::types::Timestamp;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// The clock that stamps patrol records.
    pub server_time: Timestamp,
    pub check_in_radius_m: f64,
    pub daily_patrol_target: u32,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = guardpost_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("Health check could not reach the database");
    }

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        server_time: state.clock.now(),
        check_in_radius_m: CHECK_IN_RADIUS_M,
        daily_patrol_target: state.config.daily_patrol_target,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
