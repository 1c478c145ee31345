// File: quizkid-core/src/repositories/postgres/quizzes.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use sqlx::postgres::PgRow;
use uuid::Uuid;
use quizkid_common::error::Error;
use quizkid_common::models::quiz::{Quiz, QuizQuestion};
use quizkid_common::traits::repository_traits::QuizRepository;

pub struct PostgresQuizRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresQuizRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_quiz(r: &PgRow) -> Result<Quiz, Error> {
    let subject: String = r.try_get("subject")?;
    let difficulty: String = r.try_get("difficulty")?;
    Ok(Quiz {
        quiz_id: r.try_get("quiz_id")?,
        title: r.try_get("title")?,
        description: r.try_get("description")?,
        subject: subject.parse()?,
        difficulty: difficulty.parse()?,
        created_by: r.try_get("created_by")?,
        is_published: r.try_get("is_published")?,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
    })
}

fn row_to_question(r: &PgRow) -> Result<QuizQuestion, Error> {
    let options: serde_json::Value = r.try_get("options")?;
    Ok(QuizQuestion {
        question_id: r.try_get("question_id")?,
        quiz_id: r.try_get("quiz_id")?,
        position: r.try_get("position")?,
        prompt: r.try_get("prompt")?,
        options: serde_json::from_value(options)?,
        correct_option: r.try_get("correct_option")?,
        points: r.try_get("points")?,
    })
}

#[async_trait]
impl QuizRepository for PostgresQuizRepository {
    async fn create_quiz(&self, quiz: &Quiz, questions: &[QuizQuestion]) -> Result<(), Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO quizzes (
                quiz_id,
                title,
                description,
                subject,
                difficulty,
                created_by,
                is_published,
                created_at,
                updated_at
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
            "#,
        )
            .bind(quiz.quiz_id)
            .bind(&quiz.title)
            .bind(&quiz.description)
            .bind(quiz.subject.to_string())
            .bind(quiz.difficulty.to_string())
            .bind(quiz.created_by)
            .bind(quiz.is_published)
            .bind(quiz.created_at)
            .bind(quiz.updated_at)
            .execute(&mut *tx)
            .await?;

        for q in questions {
            sqlx::query(
                r#"
                INSERT INTO quiz_questions (
                    question_id,
                    quiz_id,
                    position,
                    prompt,
                    options,
                    correct_option,
                    points
                )
                VALUES ($1,$2,$3,$4,$5,$6,$7)
                "#,
            )
                .bind(q.question_id)
                .bind(q.quiz_id)
                .bind(q.position)
                .bind(&q.prompt)
                .bind(serde_json::to_value(&q.options)?)
                .bind(q.correct_option)
                .bind(q.points)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get_quiz(&self, quiz_id: Uuid) -> Result<Option<Quiz>, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT
                quiz_id,
                title,
                description,
                subject,
                difficulty,
                created_by,
                is_published,
                created_at,
                updated_at
            FROM quizzes
            WHERE quiz_id = $1
            "#,
        )
            .bind(quiz_id)
            .fetch_optional(&self.pool)
            .await?;

        match row_opt {
            Some(r) => Ok(Some(row_to_quiz(&r)?)),
            None => Ok(None),
        }
    }

    async fn get_questions(&self, quiz_id: Uuid) -> Result<Vec<QuizQuestion>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                question_id,
                quiz_id,
                position,
                prompt,
                options,
                correct_option,
                points
            FROM quiz_questions
            WHERE quiz_id = $1
            ORDER BY position ASC
            "#,
        )
            .bind(quiz_id)
            .fetch_all(&self.pool)
            .await?;

        let mut list = Vec::new();
        for r in rows {
            list.push(row_to_question(&r)?);
        }
        Ok(list)
    }

    async fn update_quiz(&self, quiz: &Quiz) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE quizzes
            SET
              title = $1,
              description = $2,
              subject = $3,
              difficulty = $4,
              is_published = $5,
              updated_at = $6
            WHERE quiz_id = $7
            "#,
        )
            .bind(&quiz.title)
            .bind(&quiz.description)
            .bind(quiz.subject.to_string())
            .bind(quiz.difficulty.to_string())
            .bind(quiz.is_published)
            .bind(quiz.updated_at)
            .bind(quiz.quiz_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_quiz(&self, quiz_id: Uuid) -> Result<(), Error> {
        sqlx::query("DELETE FROM quizzes WHERE quiz_id = $1")
            .bind(quiz_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_published(&self) -> Result<Vec<Quiz>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                quiz_id,
                title,
                description,
                subject,
                difficulty,
                created_by,
                is_published,
                created_at,
                updated_at
            FROM quizzes
            WHERE is_published = TRUE
            ORDER BY title ASC
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        let mut list = Vec::new();
        for r in rows {
            list.push(row_to_quiz(&r)?);
        }
        Ok(list)
    }
}
