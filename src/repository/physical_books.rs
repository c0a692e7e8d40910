//! Physical copy repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{PhysicalBook, PhysicalBookStatus},
};

#[derive(Clone)]
pub struct PhysicalBooksRepository {
    pool: Pool<Postgres>,
}

impl PhysicalBooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get copy by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<PhysicalBook> {
        sqlx::query_as::<_, PhysicalBook>("SELECT * FROM physical_books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", id)))
    }

    /// List all copies of a catalog entry
    pub async fn list_for_isbn(&self, isbn: &str) -> AppResult<Vec<PhysicalBook>> {
        let copies = sqlx::query_as::<_, PhysicalBook>(
            "SELECT * FROM physical_books WHERE isbn = $1 ORDER BY id",
        )
        .bind(isbn)
        .fetch_all(&self.pool)
        .await?;
        Ok(copies)
    }

    /// List shelved (AtLibrary) copies of a catalog entry at one branch,
    /// lowest id first
    pub async fn list_shelved(&self, isbn: &str, library_id: i32) -> AppResult<Vec<PhysicalBook>> {
        let copies = sqlx::query_as::<_, PhysicalBook>(
            "SELECT * FROM physical_books WHERE isbn = $1 AND library_id = $2 AND status = 0 ORDER BY id",
        )
        .bind(isbn)
        .bind(library_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(copies)
    }

    /// Add a copy of an existing catalog entry to a branch
    pub async fn create(&self, isbn: &str, library_id: i32) -> AppResult<PhysicalBook> {
        let copy = sqlx::query_as::<_, PhysicalBook>(
            r#"
            INSERT INTO physical_books (isbn, library_id, status, crea_date)
            VALUES ($1, $2, 0, NOW())
            RETURNING *
            "#,
        )
        .bind(isbn)
        .bind(library_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(copy)
    }

    /// Conditional status flip; returns false if the copy was not in the
    /// expected state (lost a race with another writer)
    pub async fn set_status(
        &self,
        id: i32,
        from: PhysicalBookStatus,
        to: PhysicalBookStatus,
    ) -> AppResult<bool> {
        let result = sqlx::query("UPDATE physical_books SET status = $1 WHERE id = $2 AND status = $3")
            .bind(i16::from(to))
            .bind(id)
            .bind(i16::from(from))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}
