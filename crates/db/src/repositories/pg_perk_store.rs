//! Postgres implementation of [`PerkStore`] over the `perks` table.

use async_trait::async_trait;
use perks_core::types::DbId;
use sqlx::PgPool;

use crate::models::perk::{NewPerk, Perk, PerkChanges};
use crate::repositories::perk_store::{PerkStore, StoreError};

/// Column list for `perks` queries.
const COLUMNS: &str = "\
    id, title, description, category, discount_percent, merchant, \
    created_at, updated_at";

/// Newest first; `id` breaks ties between rows inserted in the same instant.
const NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

/// Perk store backed by a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgPerkStore {
    pool: PgPool,
}

impl PgPerkStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PerkStore for PgPerkStore {
    async fn insert(&self, perk: &NewPerk) -> Result<Perk, StoreError> {
        let query = format!(
            "INSERT INTO perks (title, description, category, discount_percent, merchant) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Perk>(&query)
            .bind(&perk.title)
            .bind(&perk.description)
            .bind(perk.category.as_str())
            .bind(perk.discount_percent)
            .bind(&perk.merchant)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Perk>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM perks WHERE id = $1");
        let row = sqlx::query_as::<_, Perk>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_title(&self, title: &str) -> Result<Vec<Perk>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM perks WHERE title = $1 {NEWEST_FIRST}");
        let rows = sqlx::query_as::<_, Perk>(&query)
            .bind(title)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_all(&self) -> Result<Vec<Perk>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM perks {NEWEST_FIRST}");
        let rows = sqlx::query_as::<_, Perk>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Uses `COALESCE` so only provided fields are changed.
    async fn update_by_id(
        &self,
        id: DbId,
        changes: &PerkChanges,
    ) -> Result<Option<Perk>, StoreError> {
        let query = format!(
            "UPDATE perks SET \
                 title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 category = COALESCE($4, category), \
                 discount_percent = COALESCE($5, discount_percent), \
                 merchant = COALESCE($6, merchant) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Perk>(&query)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.description)
            .bind(changes.category.map(|c| c.as_str()))
            .bind(changes.discount_percent)
            .bind(&changes.merchant)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_by_id(&self, id: DbId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM perks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}
