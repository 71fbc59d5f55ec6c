use std::sync::Arc;

use perks_db::repositories::PerkStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Record store for perks (owns the database handle).
    pub perks: Arc<dyn PerkStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
