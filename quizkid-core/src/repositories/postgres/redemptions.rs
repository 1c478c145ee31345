// File: quizkid-core/src/repositories/postgres/redemptions.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use sqlx::postgres::PgRow;
use uuid::Uuid;
use quizkid_common::error::Error;
use quizkid_common::models::redeemable::Redemption;
use quizkid_common::traits::repository_traits::RedemptionRepository;

pub struct PostgresRedemptionRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresRedemptionRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_redemption(r: &PgRow) -> Result<Redemption, Error> {
    let status: String = r.try_get("status")?;
    Ok(Redemption {
        redemption_id: r.try_get("redemption_id")?,
        wallet_id: r.try_get("wallet_id")?,
        item_id: r.try_get("item_id")?,
        status: status.parse()?,
        coins_spent: r.try_get("coins_spent")?,
        silver_gems_spent: r.try_get("silver_gems_spent")?,
        gold_coins_spent: r.try_get("gold_coins_spent")?,
        rubies_spent: r.try_get("rubies_spent")?,
        sapphires_spent: r.try_get("sapphires_spent")?,
        diamonds_spent: r.try_get("diamonds_spent")?,
        note: r.try_get("note")?,
        requested_at: r.try_get("requested_at")?,
        resolved_at: r.try_get("resolved_at")?,
        fulfilled_at: r.try_get("fulfilled_at")?,
    })
}

#[async_trait]
impl RedemptionRepository for PostgresRedemptionRepository {
    async fn create_redemption(&self, redemption: &Redemption) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO redemptions (
                redemption_id,
                wallet_id,
                item_id,
                status,
                coins_spent,
                silver_gems_spent,
                gold_coins_spent,
                rubies_spent,
                sapphires_spent,
                diamonds_spent,
                note,
                requested_at,
                resolved_at,
                fulfilled_at
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14)
            "#,
        )
            .bind(redemption.redemption_id)
            .bind(redemption.wallet_id)
            .bind(redemption.item_id)
            .bind(redemption.status.to_string())
            .bind(redemption.coins_spent)
            .bind(redemption.silver_gems_spent)
            .bind(redemption.gold_coins_spent)
            .bind(redemption.rubies_spent)
            .bind(redemption.sapphires_spent)
            .bind(redemption.diamonds_spent)
            .bind(&redemption.note)
            .bind(redemption.requested_at)
            .bind(redemption.resolved_at)
            .bind(redemption.fulfilled_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_redemption(&self, redemption_id: Uuid) -> Result<Option<Redemption>, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT
                redemption_id,
                wallet_id,
                item_id,
                status,
                coins_spent,
                silver_gems_spent,
                gold_coins_spent,
                rubies_spent,
                sapphires_spent,
                diamonds_spent,
                note,
                requested_at,
                resolved_at,
                fulfilled_at
            FROM redemptions
            WHERE redemption_id = $1
            "#,
        )
            .bind(redemption_id)
            .fetch_optional(&self.pool)
            .await?;

        match row_opt {
            Some(r) => Ok(Some(row_to_redemption(&r)?)),
            None => Ok(None),
        }
    }

    async fn update_redemption(&self, redemption: &Redemption) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE redemptions
            SET
              status = $1,
              note = $2,
              resolved_at = $3,
              fulfilled_at = $4
            WHERE redemption_id = $5
            "#,
        )
            .bind(redemption.status.to_string())
            .bind(&redemption.note)
            .bind(redemption.resolved_at)
            .bind(redemption.fulfilled_at)
            .bind(redemption.redemption_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_for_wallet(&self, wallet_id: Uuid, limit: i64) -> Result<Vec<Redemption>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                redemption_id,
                wallet_id,
                item_id,
                status,
                coins_spent,
                silver_gems_spent,
                gold_coins_spent,
                rubies_spent,
                sapphires_spent,
                diamonds_spent,
                note,
                requested_at,
                resolved_at,
                fulfilled_at
            FROM redemptions
            WHERE wallet_id = $1
            ORDER BY requested_at DESC
            LIMIT $2
            "#,
        )
            .bind(wallet_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let mut list = Vec::new();
        for r in rows {
            list.push(row_to_redemption(&r)?);
        }
        Ok(list)
    }

    async fn list_pending(&self) -> Result<Vec<Redemption>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                redemption_id,
                wallet_id,
                item_id,
                status,
                coins_spent,
                silver_gems_spent,
                gold_coins_spent,
                rubies_spent,
                sapphires_spent,
                diamonds_spent,
                note,
                requested_at,
                resolved_at,
                fulfilled_at
            FROM redemptions
            WHERE status = 'PendingApproval'
            ORDER BY requested_at ASC
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        let mut list = Vec::new();
        for r in rows {
            list.push(row_to_redemption(&r)?);
        }
        Ok(list)
    }
}
