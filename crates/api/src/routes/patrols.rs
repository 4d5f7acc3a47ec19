//! Route definitions for the `/patrols` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::patrols;
use crate::state::AppState;

/// Routes mounted at `/patrols`.
///
/// ```text
/// GET    /                                  -> list (?date, ?guard_id)
/// POST   /                                  -> submit
/// GET    /export                            -> export_csv (?date)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(patrols::list).post(patrols::submit))
        .route("/export", get(patrols::export_csv))
}
