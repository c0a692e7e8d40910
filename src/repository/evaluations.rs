//! Evaluations repository for database operations

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::Evaluation};

#[derive(Clone)]
pub struct EvaluationsRepository {
    pool: Pool<Postgres>,
}

impl EvaluationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List evaluations of a catalog entry, newest first
    pub async fn list_for_isbn(&self, isbn: &str) -> AppResult<Vec<Evaluation>> {
        let evaluations = sqlx::query_as::<_, Evaluation>(
            "SELECT * FROM evaluations WHERE isbn = $1 ORDER BY emit_date DESC",
        )
        .bind(isbn)
        .fetch_all(&self.pool)
        .await?;
        Ok(evaluations)
    }

    /// Insert or replace the user's evaluation of a catalog entry
    pub async fn upsert(
        &self,
        user_id: i32,
        isbn: &str,
        rating: i16,
        comment: Option<&str>,
    ) -> AppResult<Evaluation> {
        let evaluation = sqlx::query_as::<_, Evaluation>(
            r#"
            INSERT INTO evaluations (user_id, isbn, rating, comment, emit_date)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (user_id, isbn)
            DO UPDATE SET rating = EXCLUDED.rating, comment = EXCLUDED.comment, emit_date = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(isbn)
        .bind(rating)
        .bind(comment)
        .fetch_one(&self.pool)
        .await?;
        Ok(evaluation)
    }
}
