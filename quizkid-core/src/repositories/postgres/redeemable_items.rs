// File: quizkid-core/src/repositories/postgres/redeemable_items.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use sqlx::postgres::PgRow;
use uuid::Uuid;
use quizkid_common::error::Error;
use quizkid_common::models::redeemable::RedeemableItem;
use quizkid_common::traits::repository_traits::RedeemableItemRepository;

pub struct PostgresRedeemableItemRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresRedeemableItemRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_item(r: &PgRow) -> Result<RedeemableItem, Error> {
    let category: String = r.try_get("category")?;
    Ok(RedeemableItem {
        item_id: r.try_get("item_id")?,
        name: r.try_get("name")?,
        description: r.try_get("description")?,
        category: category.parse()?,
        coins_cost: r.try_get("coins_cost")?,
        silver_gems_cost: r.try_get("silver_gems_cost")?,
        gold_coins_cost: r.try_get("gold_coins_cost")?,
        rubies_cost: r.try_get("rubies_cost")?,
        sapphires_cost: r.try_get("sapphires_cost")?,
        diamonds_cost: r.try_get("diamonds_cost")?,
        min_level: r.try_get("min_level")?,
        quantity_available: r.try_get("quantity_available")?,
        is_active: r.try_get("is_active")?,
        expires_at: r.try_get("expires_at")?,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
    })
}

#[async_trait]
impl RedeemableItemRepository for PostgresRedeemableItemRepository {
    async fn create_item(&self, item: &RedeemableItem) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO redeemable_items (
                item_id,
                name,
                description,
                category,
                coins_cost,
                silver_gems_cost,
                gold_coins_cost,
                rubies_cost,
                sapphires_cost,
                diamonds_cost,
                min_level,
                quantity_available,
                is_active,
                expires_at,
                created_at,
                updated_at
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16)
            "#,
        )
            .bind(item.item_id)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.category.to_string())
            .bind(item.coins_cost)
            .bind(item.silver_gems_cost)
            .bind(item.gold_coins_cost)
            .bind(item.rubies_cost)
            .bind(item.sapphires_cost)
            .bind(item.diamonds_cost)
            .bind(item.min_level)
            .bind(item.quantity_available)
            .bind(item.is_active)
            .bind(item.expires_at)
            .bind(item.created_at)
            .bind(item.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_item(&self, item_id: Uuid) -> Result<Option<RedeemableItem>, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT
                item_id,
                name,
                description,
                category,
                coins_cost,
                silver_gems_cost,
                gold_coins_cost,
                rubies_cost,
                sapphires_cost,
                diamonds_cost,
                min_level,
                quantity_available,
                is_active,
                expires_at,
                created_at,
                updated_at
            FROM redeemable_items
            WHERE item_id = $1
            "#,
        )
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?;

        match row_opt {
            Some(r) => Ok(Some(row_to_item(&r)?)),
            None => Ok(None),
        }
    }

    async fn update_item(&self, item: &RedeemableItem) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE redeemable_items
            SET
              name = $1,
              description = $2,
              category = $3,
              coins_cost = $4,
              silver_gems_cost = $5,
              gold_coins_cost = $6,
              rubies_cost = $7,
              sapphires_cost = $8,
              diamonds_cost = $9,
              min_level = $10,
              quantity_available = $11,
              is_active = $12,
              expires_at = $13,
              updated_at = $14
            WHERE item_id = $15
            "#,
        )
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.category.to_string())
            .bind(item.coins_cost)
            .bind(item.silver_gems_cost)
            .bind(item.gold_coins_cost)
            .bind(item.rubies_cost)
            .bind(item.sapphires_cost)
            .bind(item.diamonds_cost)
            .bind(item.min_level)
            .bind(item.quantity_available)
            .bind(item.is_active)
            .bind(item.expires_at)
            .bind(item.updated_at)
            .bind(item.item_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_item(&self, item_id: Uuid) -> Result<(), Error> {
        sqlx::query("DELETE FROM redeemable_items WHERE item_id = $1")
            .bind(item_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_active_items(&self) -> Result<Vec<RedeemableItem>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                item_id,
                name,
                description,
                category,
                coins_cost,
                silver_gems_cost,
                gold_coins_cost,
                rubies_cost,
                sapphires_cost,
                diamonds_cost,
                min_level,
                quantity_available,
                is_active,
                expires_at,
                created_at,
                updated_at
            FROM redeemable_items
            WHERE is_active = TRUE
            ORDER BY name ASC
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        let mut list = Vec::new();
        for r in rows {
            list.push(row_to_item(&r)?);
        }
        Ok(list)
    }
}
