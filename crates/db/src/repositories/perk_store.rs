//! The record store contract and its error type.

use async_trait::async_trait;
use perks_core::types::DbId;
use sqlx::error::ErrorKind;

use crate::models::perk::{NewPerk, Perk, PerkChanges};

/// Failures surfaced by a [`PerkStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("Duplicate value violates unique constraint: {constraint}")]
    Duplicate { constraint: String },

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        if let Some(db_err) = error.as_database_error() {
            if matches!(db_err.kind(), ErrorKind::UniqueViolation) {
                return Self::Duplicate {
                    constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                };
            }
        }
        Self::Database(error)
    }
}

/// Single-collection store for perks.
///
/// Every method is one round-trip. Listing methods return newest first.
#[async_trait]
pub trait PerkStore: Send + Sync {
    /// Insert a validated perk. Fails with [`StoreError::Duplicate`] when the
    /// `(title, merchant)` pair already exists.
    async fn insert(&self, perk: &NewPerk) -> Result<Perk, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Perk>, StoreError>;

    /// Perks whose title equals `title` exactly.
    async fn find_by_title(&self, title: &str) -> Result<Vec<Perk>, StoreError>;

    async fn find_all(&self) -> Result<Vec<Perk>, StoreError>;

    /// Apply `changes` and return the updated row, or `None` if `id` is unknown.
    async fn update_by_id(
        &self,
        id: DbId,
        changes: &PerkChanges,
    ) -> Result<Option<Perk>, StoreError>;

    /// Returns `true` if a row was deleted.
    async fn delete_by_id(&self, id: DbId) -> Result<bool, StoreError>;

    /// Confirm the backing database is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
