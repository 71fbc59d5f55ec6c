//! Query parameter types for the perk endpoints.

use serde::Deserialize;

/// Query parameters for listing and title filtering (`?title=`).
#[derive(Debug, Default, Deserialize)]
pub struct PerkTitleParams {
    pub title: Option<String>,
}
