//! Route definitions for the `/guards` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::guards;
use crate::state::AppState;

/// Routes mounted at `/guards`.
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
        .route("/", get(guards::list).post(guards::create))
        .route(
            "/{id}",
            get(guards::get_by_id)
                .put(guards::update)
                .delete(guards::delete),
        )
}
