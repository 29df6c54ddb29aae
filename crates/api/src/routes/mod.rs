pub mod health;
pub mod release;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /releases                 list, create
/// /releases/statuses        status catalog
/// /releases/{id}            get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/releases", release::router())
}
