// File: quizkid-core/src/repositories/postgres/kids.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use sqlx::postgres::PgRow;
use uuid::Uuid;
use quizkid_common::error::Error;
use quizkid_common::models::kid::Kid;
use quizkid_common::traits::repository_traits::KidRepository;

pub struct PostgresKidRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresKidRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_kid(r: &PgRow) -> Result<Kid, Error> {
    let settings: serde_json::Value = r.try_get("settings")?;
    Ok(Kid {
        kid_id: r.try_get("kid_id")?,
        display_name: r.try_get("display_name")?,
        birth_year: r.try_get("birth_year")?,
        avatar: r.try_get("avatar")?,
        settings: serde_json::from_value(settings)?,
        is_active: r.try_get("is_active")?,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
    })
}

#[async_trait]
impl KidRepository for PostgresKidRepository {
    async fn create_kid(&self, kid: &Kid) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO kids (
                kid_id,
                display_name,
                birth_year,
                avatar,
                settings,
                is_active,
                created_at,
                updated_at
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
            "#,
        )
            .bind(kid.kid_id)
            .bind(&kid.display_name)
            .bind(kid.birth_year)
            .bind(&kid.avatar)
            .bind(serde_json::to_value(&kid.settings)?)
            .bind(kid.is_active)
            .bind(kid.created_at)
            .bind(kid.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_kid(&self, kid_id: Uuid) -> Result<Option<Kid>, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT
                kid_id,
                display_name,
                birth_year,
                avatar,
                settings,
                is_active,
                created_at,
                updated_at
            FROM kids
            WHERE kid_id = $1
            "#,
        )
            .bind(kid_id)
            .fetch_optional(&self.pool)
            .await?;

        match row_opt {
            Some(r) => Ok(Some(row_to_kid(&r)?)),
            None => Ok(None),
        }
    }

    async fn update_kid(&self, kid: &Kid) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE kids
            SET
              display_name = $1,
              birth_year = $2,
              avatar = $3,
              settings = $4,
              is_active = $5,
              updated_at = $6
            WHERE kid_id = $7
            "#,
        )
            .bind(&kid.display_name)
            .bind(kid.birth_year)
            .bind(&kid.avatar)
            .bind(serde_json::to_value(&kid.settings)?)
            .bind(kid.is_active)
            .bind(kid.updated_at)
            .bind(kid.kid_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_kid(&self, kid_id: Uuid) -> Result<(), Error> {
        sqlx::query("DELETE FROM kids WHERE kid_id = $1")
            .bind(kid_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_active_kids(&self) -> Result<Vec<Kid>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                kid_id,
                display_name,
                birth_year,
                avatar,
                settings,
                is_active,
                created_at,
                updated_at
            FROM kids
            WHERE is_active = TRUE
            ORDER BY display_name ASC
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        let mut list = Vec::new();
        for r in rows {
            list.push(row_to_kid(&r)?);
        }
        Ok(list)
    }
}
