pub mod auth;
pub mod checkpoints;
pub mod guards;
pub mod health;
pub mod patrols;
pub mod reports;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (no tokens issued)
///
/// /checkpoints                         list, create
/// /checkpoints/{id}                    get, update, delete
///
/// /guards                              list, create
/// /guards/{id}                         get, update, delete
///
/// /patrols                             list (?date, ?guard_id), submit check-in
/// /patrols/export                      CSV download (?date)
///
/// /reports/daily                       same-day completion summary (?date)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/checkpoints", checkpoints::router())
        .nest("/guards", guards::router())
        .nest("/patrols", patrols::router())
        .nest("/reports", reports::router())
}
