//! Route definitions for the `/checkpoints` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::checkpoints;
use crate::state::AppState;

/// Routes mounted at `/checkpoints`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(checkpoints::list).post(checkpoints::create))
        .route(
            "/{id}",
            get(checkpoints::get_by_id)
                .put(checkpoints::update)
                .delete(checkpoints::delete),
        )
}
