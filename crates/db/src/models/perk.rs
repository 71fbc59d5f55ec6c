//! Perk row model.
//!
//! Validated create/update inputs live in `perks_core::perk` and are
//! re-exported here so callers only need this module.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use perks_core::types::{DbId, Timestamp};

pub use perks_core::perk::{NewPerk, PerkCategory, PerkChanges};

/// A row from the `perks` table.
///
/// Serialized with camelCase keys to match the public JSON contract. The
/// `category` column is decoded back into [`PerkCategory`], so a stored value
/// outside the fixed set surfaces as a decode error.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Perk {
    pub id: DbId,
    pub title: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub category: PerkCategory,
    pub discount_percent: f64,
    pub merchant: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
