pub mod health;
pub mod perks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /perks                 list (or filter by ?title=), create
/// /perks/search          filter by exact title
/// /perks/{id}            get, update (PUT/PATCH), delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/perks", perks::router())
}
