// File: quizkid-core/src/repositories/postgres/guardians.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;
use quizkid_common::error::Error;
use quizkid_common::models::kid::Guardian;
use quizkid_common::traits::repository_traits::GuardianRepository;

pub struct PostgresGuardianRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresGuardianRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuardianRepository for PostgresGuardianRepository {
    async fn create_guardian(&self, guardian: &Guardian) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO guardians (
                guardian_id,
                display_name,
                email,
                is_active,
                created_at,
                updated_at
            )
            VALUES ($1,$2,$3,$4,$5,$6)
            "#,
        )
            .bind(guardian.guardian_id)
            .bind(&guardian.display_name)
            .bind(&guardian.email)
            .bind(guardian.is_active)
            .bind(guardian.created_at)
            .bind(guardian.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_guardian(&self, guardian_id: Uuid) -> Result<Option<Guardian>, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT
                guardian_id,
                display_name,
                email,
                is_active,
                created_at,
                updated_at
            FROM guardians
            WHERE guardian_id = $1
            "#,
        )
            .bind(guardian_id)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(r) = row_opt {
            let g = Guardian {
                guardian_id: r.try_get("guardian_id")?,
                display_name: r.try_get("display_name")?,
                email: r.try_get("email")?,
                is_active: r.try_get("is_active")?,
                created_at: r.try_get("created_at")?,
                updated_at: r.try_get("updated_at")?,
            };
            Ok(Some(g))
        } else {
            Ok(None)
        }
    }

    async fn get_guardian_by_email(&self, email: &str) -> Result<Option<Guardian>, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT
                guardian_id,
                display_name,
                email,
                is_active,
                created_at,
                updated_at
            FROM guardians
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(r) = row_opt {
            let g = Guardian {
                guardian_id: r.try_get("guardian_id")?,
                display_name: r.try_get("display_name")?,
                email: r.try_get("email")?,
                is_active: r.try_get("is_active")?,
                created_at: r.try_get("created_at")?,
                updated_at: r.try_get("updated_at")?,
            };
            Ok(Some(g))
        } else {
            Ok(None)
        }
    }

    async fn update_guardian(&self, guardian: &Guardian) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE guardians
            SET
              display_name = $1,
              email = $2,
              is_active = $3,
              updated_at = $4
            WHERE guardian_id = $5
            "#,
        )
            .bind(&guardian.display_name)
            .bind(&guardian.email)
            .bind(guardian.is_active)
            .bind(guardian.updated_at)
            .bind(guardian.guardian_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_guardian(&self, guardian_id: Uuid) -> Result<(), Error> {
        sqlx::query("DELETE FROM guardians WHERE guardian_id = $1")
            .bind(guardian_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
