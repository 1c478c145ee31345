// File: quizkid-core/src/repositories/postgres/wallet_transactions.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres, Row};
use sqlx::postgres::PgRow;
use uuid::Uuid;
use quizkid_common::error::Error;
use quizkid_common::models::transaction::{ActivityType, WalletTransaction};
use quizkid_common::traits::repository_traits::WalletTransactionRepository;

pub struct PostgresWalletTransactionRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresWalletTransactionRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_transaction(r: &PgRow) -> Result<WalletTransaction, Error> {
    let currency: String = r.try_get("currency")?;
    let kind: String = r.try_get("kind")?;
    let activity: String = r.try_get("activity")?;
    Ok(WalletTransaction {
        transaction_id: r.try_get("transaction_id")?,
        wallet_id: r.try_get("wallet_id")?,
        currency: currency.parse()?,
        amount: r.try_get("amount")?,
        kind: kind.parse()?,
        activity: activity.parse()?,
        description: r.try_get("description")?,
        related_entity_id: r.try_get("related_entity_id")?,
        balance_after: r.try_get("balance_after")?,
        created_at: r.try_get("created_at")?,
    })
}

#[async_trait]
impl WalletTransactionRepository for PostgresWalletTransactionRepository {
    async fn insert_transaction(&self, tx: &WalletTransaction) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO wallet_transactions (
                transaction_id,
                wallet_id,
                currency,
                amount,
                kind,
                activity,
                description,
                related_entity_id,
                balance_after,
                created_at
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)
            "#,
        )
            .bind(tx.transaction_id)
            .bind(tx.wallet_id)
            .bind(tx.currency.to_string())
            .bind(tx.amount)
            .bind(tx.kind.to_string())
            .bind(tx.activity.to_string())
            .bind(&tx.description)
            .bind(tx.related_entity_id)
            .bind(tx.balance_after)
            .bind(tx.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_for_wallet(
        &self,
        wallet_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WalletTransaction>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                transaction_id,
                wallet_id,
                currency,
                amount,
                kind,
                activity,
                description,
                related_entity_id,
                balance_after,
                created_at
            FROM wallet_transactions
            WHERE wallet_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
            .bind(wallet_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let mut list = Vec::new();
        for r in rows {
            list.push(row_to_transaction(&r)?);
        }
        Ok(list)
    }

    async fn list_for_wallet_by_activity(
        &self,
        wallet_id: Uuid,
        activity: ActivityType,
        limit: i64,
    ) -> Result<Vec<WalletTransaction>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                transaction_id,
                wallet_id,
                currency,
                amount,
                kind,
                activity,
                description,
                related_entity_id,
                balance_after,
                created_at
            FROM wallet_transactions
            WHERE wallet_id = $1
              AND activity = $2
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
            .bind(wallet_id)
            .bind(activity.to_string())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let mut list = Vec::new();
        for r in rows {
            list.push(row_to_transaction(&r)?);
        }
        Ok(list)
    }

    async fn activity_exists_on(
        &self,
        wallet_id: Uuid,
        activity: ActivityType,
        date: NaiveDate,
    ) -> Result<bool, Error> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM wallet_transactions
                WHERE wallet_id = $1
                  AND activity = $2
                  AND (created_at AT TIME ZONE 'UTC')::date = $3
            ) AS found
            "#,
        )
            .bind(wallet_id)
            .bind(activity.to_string())
            .bind(date)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("found")?)
    }

    async fn count_for_wallet(&self, wallet_id: Uuid) -> Result<i64, Error> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS cnt FROM wallet_transactions WHERE wallet_id = $1",
        )
            .bind(wallet_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("cnt")?)
    }
}
