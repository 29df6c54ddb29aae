//! Route definitions for the `/releases` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::release;
use crate::state::AppState;

/// Routes mounted at `/releases`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /statuses      -> list_statuses
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(release::list).post(release::create))
        .route("/statuses", get(release::list_statuses))
        .route(
            "/{id}",
            get(release::get_by_id)
                .put(release::update)
                .delete(release::delete),
        )
}
