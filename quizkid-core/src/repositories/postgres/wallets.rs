// File: quizkid-core/src/repositories/postgres/wallets.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;
use quizkid_common::error::Error;
use quizkid_common::models::wallet::Wallet;
use quizkid_common::traits::repository_traits::WalletRepository;

pub struct PostgresWalletRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresWalletRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WalletRepository for PostgresWalletRepository {
    async fn create_wallet(&self, wallet: &Wallet) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO wallets (
                wallet_id,
                kid_id,
                coins,
                silver_gems,
                gold_coins,
                rubies,
                sapphires,
                diamonds,
                total_lifetime_coins,
                current_level,
                experience_points,
                version,
                created_at,
                updated_at
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14)
            "#,
        )
            .bind(wallet.wallet_id)
            .bind(wallet.kid_id)
            .bind(wallet.coins)
            .bind(wallet.silver_gems)
            .bind(wallet.gold_coins)
            .bind(wallet.rubies)
            .bind(wallet.sapphires)
            .bind(wallet.diamonds)
            .bind(wallet.total_lifetime_coins)
            .bind(wallet.current_level)
            .bind(wallet.experience_points)
            .bind(wallet.version)
            .bind(wallet.created_at)
            .bind(wallet.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_wallet(&self, wallet_id: Uuid) -> Result<Option<Wallet>, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT
                wallet_id,
                kid_id,
                coins,
                silver_gems,
                gold_coins,
                rubies,
                sapphires,
                diamonds,
                total_lifetime_coins,
                current_level,
                experience_points,
                version,
                created_at,
                updated_at
            FROM wallets
            WHERE wallet_id = $1
            "#,
        )
            .bind(wallet_id)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(r) = row_opt {
            let w = Wallet {
                wallet_id: r.try_get("wallet_id")?,
                kid_id: r.try_get("kid_id")?,
                coins: r.try_get("coins")?,
                silver_gems: r.try_get("silver_gems")?,
                gold_coins: r.try_get("gold_coins")?,
                rubies: r.try_get("rubies")?,
                sapphires: r.try_get("sapphires")?,
                diamonds: r.try_get("diamonds")?,
                total_lifetime_coins: r.try_get("total_lifetime_coins")?,
                current_level: r.try_get("current_level")?,
                experience_points: r.try_get("experience_points")?,
                version: r.try_get("version")?,
                created_at: r.try_get("created_at")?,
                updated_at: r.try_get("updated_at")?,
            };
            Ok(Some(w))
        } else {
            Ok(None)
        }
    }

    async fn get_wallet_by_kid(&self, kid_id: Uuid) -> Result<Option<Wallet>, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT
                wallet_id,
                kid_id,
                coins,
                silver_gems,
                gold_coins,
                rubies,
                sapphires,
                diamonds,
                total_lifetime_coins,
                current_level,
                experience_points,
                version,
                created_at,
                updated_at
            FROM wallets
            WHERE kid_id = $1
            "#,
        )
            .bind(kid_id)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(r) = row_opt {
            let w = Wallet {
                wallet_id: r.try_get("wallet_id")?,
                kid_id: r.try_get("kid_id")?,
                coins: r.try_get("coins")?,
                silver_gems: r.try_get("silver_gems")?,
                gold_coins: r.try_get("gold_coins")?,
                rubies: r.try_get("rubies")?,
                sapphires: r.try_get("sapphires")?,
                diamonds: r.try_get("diamonds")?,
                total_lifetime_coins: r.try_get("total_lifetime_coins")?,
                current_level: r.try_get("current_level")?,
                experience_points: r.try_get("experience_points")?,
                version: r.try_get("version")?,
                created_at: r.try_get("created_at")?,
                updated_at: r.try_get("updated_at")?,
            };
            Ok(Some(w))
        } else {
            Ok(None)
        }
    }

    async fn update_wallet(&self, wallet: &Wallet) -> Result<(), Error> {
        // Compare-and-swap on the version column. A stale snapshot means
        // another writer got there first.
        let result = sqlx::query(
            r#"
            UPDATE wallets
            SET
              coins = $1,
              silver_gems = $2,
              gold_coins = $3,
              rubies = $4,
              sapphires = $5,
              diamonds = $6,
              total_lifetime_coins = $7,
              current_level = $8,
              experience_points = $9,
              version = version + 1,
              updated_at = $10
            WHERE wallet_id = $11
              AND version = $12
            "#,
        )
            .bind(wallet.coins)
            .bind(wallet.silver_gems)
            .bind(wallet.gold_coins)
            .bind(wallet.rubies)
            .bind(wallet.sapphires)
            .bind(wallet.diamonds)
            .bind(wallet.total_lifetime_coins)
            .bind(wallet.current_level)
            .bind(wallet.experience_points)
            .bind(Utc::now())
            .bind(wallet.wallet_id)
            .bind(wallet.version)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::Conflict(format!(
                "wallet {} was modified concurrently",
                wallet.wallet_id
            )));
        }
        Ok(())
    }
}
