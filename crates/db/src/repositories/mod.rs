//! Data access for perks.
//!
//! [`PerkStore`] is the seam the HTTP layer depends on; [`PgPerkStore`] is
//! the Postgres implementation used in production.

pub mod perk_store;
pub mod pg_perk_store;

pub use perk_store::{PerkStore, StoreError};
pub use pg_perk_store::PgPerkStore;
