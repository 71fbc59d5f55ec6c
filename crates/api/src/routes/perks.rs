//! Route definitions for the perk resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::perks;
use crate::state::AppState;

/// Perk routes mounted at `/perks`.
///
/// ```text
/// GET    /              -> list_perks (filters when ?title= is present)
/// POST   /              -> create_perk
/// GET    /search        -> search_perks (?title= required)
/// GET    /{id}          -> get_perk
/// PUT    /{id}          -> update_perk
/// PATCH  /{id}          -> update_perk
/// DELETE /{id}          -> delete_perk
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(perks::list_perks).post(perks::create_perk))
        .route("/search", get(perks::search_perks))
        .route(
            "/{id}",
            get(perks::get_perk)
                .put(perks::update_perk)
                .patch(perks::update_perk)
                .delete(perks::delete_perk),
        )
}
