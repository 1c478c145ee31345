// File: quizkid-core/src/repositories/postgres/guardian_links.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use sqlx::postgres::PgRow;
use uuid::Uuid;
use quizkid_common::error::Error;
use quizkid_common::models::kid::GuardianLink;
use quizkid_common::traits::repository_traits::GuardianLinkRepository;

pub struct PostgresGuardianLinkRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresGuardianLinkRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_link(r: &PgRow) -> Result<GuardianLink, Error> {
    let relationship: String = r.try_get("relationship")?;
    Ok(GuardianLink {
        kid_id: r.try_get("kid_id")?,
        guardian_id: r.try_get("guardian_id")?,
        relationship: relationship.parse()?,
        is_primary: r.try_get("is_primary")?,
        linked_at: r.try_get("linked_at")?,
    })
}

#[async_trait]
impl GuardianLinkRepository for PostgresGuardianLinkRepository {
    async fn insert_link(&self, link: &GuardianLink) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO guardian_links (
                kid_id,
                guardian_id,
                relationship,
                is_primary,
                linked_at
            )
            VALUES ($1,$2,$3,$4,$5)
            "#,
        )
            .bind(link.kid_id)
            .bind(link.guardian_id)
            .bind(link.relationship.to_string())
            .bind(link.is_primary)
            .bind(link.linked_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_link(&self, kid_id: Uuid, guardian_id: Uuid) -> Result<(), Error> {
        sqlx::query("DELETE FROM guardian_links WHERE kid_id = $1 AND guardian_id = $2")
            .bind(kid_id)
            .bind(guardian_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_links_for_kid(&self, kid_id: Uuid) -> Result<Vec<GuardianLink>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                kid_id,
                guardian_id,
                relationship,
                is_primary,
                linked_at
            FROM guardian_links
            WHERE kid_id = $1
            ORDER BY linked_at ASC
            "#,
        )
            .bind(kid_id)
            .fetch_all(&self.pool)
            .await?;

        let mut list = Vec::new();
        for r in rows {
            list.push(row_to_link(&r)?);
        }
        Ok(list)
    }

    async fn list_links_for_guardian(&self, guardian_id: Uuid) -> Result<Vec<GuardianLink>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                kid_id,
                guardian_id,
                relationship,
                is_primary,
                linked_at
            FROM guardian_links
            WHERE guardian_id = $1
            ORDER BY linked_at ASC
            "#,
        )
            .bind(guardian_id)
            .fetch_all(&self.pool)
            .await?;

        let mut list = Vec::new();
        for r in rows {
            list.push(row_to_link(&r)?);
        }
        Ok(list)
    }
}
