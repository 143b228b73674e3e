pub mod health;
pub mod resources;

use axum::Router;

use crate::state::AppState;

/// Build the route tree served at the server root.
///
/// ```text
/// /                    banner
/// /health              liveness
/// /resources           list, create
/// /resources/{id}      get, update, delete
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/resources", resources::router())
}
