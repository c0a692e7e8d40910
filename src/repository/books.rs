//! Catalog (generic book) repository for database operations

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::book::{BookQuery, CreateGenericBook, GenericBook, GenericBookDetails},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get catalog entry by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<GenericBook> {
        sqlx::query_as::<_, GenericBook>("SELECT * FROM generic_books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Get catalog entry by ISBN
    pub async fn get_by_isbn(&self, isbn: &str) -> AppResult<GenericBook> {
        sqlx::query_as::<_, GenericBook>("SELECT * FROM generic_books WHERE isbn = $1")
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", isbn)))
    }

    /// Title lookup used for notification wording; falls back to the ISBN
    /// when the catalog entry is gone.
    pub async fn title_by_isbn(&self, isbn: &str) -> AppResult<String> {
        let title: Option<String> =
            sqlx::query_scalar("SELECT title FROM generic_books WHERE isbn = $1")
                .bind(isbn)
                .fetch_optional(&self.pool)
                .await?;
        Ok(title.unwrap_or_else(|| isbn.to_string()))
    }

    /// List catalog entries with availability counts
    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<GenericBookDetails>> {
        let limit = query.limit.unwrap_or(50).clamp(1, 200);
        let offset = query.offset.unwrap_or(0).max(0);

        let rows = sqlx::query(
            r#"
            SELECT b.*,
                   (SELECT COUNT(*) FROM physical_books p WHERE p.isbn = b.isbn) AS nb_copies,
                   (SELECT COUNT(*) FROM physical_books p WHERE p.isbn = b.isbn AND p.status = 0) AS nb_available,
                   (SELECT AVG(rating)::float8 FROM evaluations e WHERE e.isbn = b.isbn) AS rating
            FROM generic_books b
            WHERE ($1::text IS NULL OR b.title ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR b.isbn = $2)
              AND ($3::text IS NULL OR b.author ILIKE '%' || $3 || '%')
              AND ($4::text IS NULL OR b.category = $4)
            ORDER BY b.title
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(&query.title)
        .bind(&query.isbn)
        .bind(&query.author)
        .bind(&query.category)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            result.push(GenericBookDetails {
                book: GenericBook {
                    id: row.get("id"),
                    isbn: row.get("isbn"),
                    title: row.get("title"),
                    author: row.get("author"),
                    category: row.get("category"),
                    language: row.get("language"),
                    synopsis: row.get("synopsis"),
                    cover_url: row.get("cover_url"),
                },
                nb_copies: row.get("nb_copies"),
                nb_available: row.get("nb_available"),
                rating: row.get("rating"),
            });
        }
        Ok(result)
    }

    /// Create a catalog entry; the ISBN must be unique
    pub async fn create(&self, book: &CreateGenericBook) -> AppResult<GenericBook> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM generic_books WHERE isbn = $1)")
                .bind(&book.isbn)
                .fetch_one(&self.pool)
                .await?;
        if exists {
            return Err(AppError::Conflict(format!(
                "Book with ISBN {} already exists",
                book.isbn
            )));
        }

        let created = sqlx::query_as::<_, GenericBook>(
            r#"
            INSERT INTO generic_books (isbn, title, author, category, language, synopsis, cover_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.category)
        .bind(&book.language)
        .bind(&book.synopsis)
        .bind(&book.cover_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
