// File: quizkid-core/src/repositories/postgres/quiz_results.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use sqlx::postgres::PgRow;
use uuid::Uuid;
use quizkid_common::error::Error;
use quizkid_common::models::quiz::QuizResult;
use quizkid_common::traits::repository_traits::QuizResultRepository;

pub struct PostgresQuizResultRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresQuizResultRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_result(r: &PgRow) -> Result<QuizResult, Error> {
    let details: serde_json::Value = r.try_get("details")?;
    Ok(QuizResult {
        result_id: r.try_get("result_id")?,
        quiz_id: r.try_get("quiz_id")?,
        kid_id: r.try_get("kid_id")?,
        score: r.try_get("score")?,
        total_questions: r.try_get("total_questions")?,
        accuracy_percent: r.try_get("accuracy_percent")?,
        details: serde_json::from_value(details)?,
        completed_at: r.try_get("completed_at")?,
    })
}

#[async_trait]
impl QuizResultRepository for PostgresQuizResultRepository {
    async fn insert_result(&self, result: &QuizResult) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO quiz_results (
                result_id,
                quiz_id,
                kid_id,
                score,
                total_questions,
                accuracy_percent,
                details,
                completed_at
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
            "#,
        )
            .bind(result.result_id)
            .bind(result.quiz_id)
            .bind(result.kid_id)
            .bind(result.score)
            .bind(result.total_questions)
            .bind(result.accuracy_percent)
            .bind(serde_json::to_value(&result.details)?)
            .bind(result.completed_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_result(&self, result_id: Uuid) -> Result<Option<QuizResult>, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT
                result_id,
                quiz_id,
                kid_id,
                score,
                total_questions,
                accuracy_percent,
                details,
                completed_at
            FROM quiz_results
            WHERE result_id = $1
            "#,
        )
            .bind(result_id)
            .fetch_optional(&self.pool)
            .await?;

        match row_opt {
            Some(r) => Ok(Some(row_to_result(&r)?)),
            None => Ok(None),
        }
    }

    async fn list_for_kid(&self, kid_id: Uuid, limit: i64) -> Result<Vec<QuizResult>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                result_id,
                quiz_id,
                kid_id,
                score,
                total_questions,
                accuracy_percent,
                details,
                completed_at
            FROM quiz_results
            WHERE kid_id = $1
            ORDER BY completed_at DESC
            LIMIT $2
            "#,
        )
            .bind(kid_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let mut list = Vec::new();
        for r in rows {
            list.push(row_to_result(&r)?);
        }
        Ok(list)
    }

    async fn list_for_quiz(&self, quiz_id: Uuid, limit: i64) -> Result<Vec<QuizResult>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                result_id,
                quiz_id,
                kid_id,
                score,
                total_questions,
                accuracy_percent,
                details,
                completed_at
            FROM quiz_results
            WHERE quiz_id = $1
            ORDER BY completed_at DESC
            LIMIT $2
            "#,
        )
            .bind(quiz_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let mut list = Vec::new();
        for r in rows {
            list.push(row_to_result(&r)?);
        }
        Ok(list)
    }
}
