//! Libraries (branches) repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::library::{CreateLibrary, Library},
};

#[derive(Clone)]
pub struct LibrariesRepository {
    pool: Pool<Postgres>,
}

impl LibrariesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get branch by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Library> {
        sqlx::query_as::<_, Library>("SELECT * FROM libraries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Library with id {} not found", id)))
    }

    /// List all branches
    pub async fn list(&self) -> AppResult<Vec<Library>> {
        let libraries =
            sqlx::query_as::<_, Library>("SELECT * FROM libraries ORDER BY alias")
                .fetch_all(&self.pool)
                .await?;
        Ok(libraries)
    }

    /// Create a branch; the alias must be unique
    pub async fn create(&self, library: &CreateLibrary) -> AppResult<Library> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM libraries WHERE alias = $1)")
                .bind(&library.alias)
                .fetch_one(&self.pool)
                .await?;
        if exists {
            return Err(AppError::Conflict(format!(
                "Library with alias {} already exists",
                library.alias
            )));
        }

        let created = sqlx::query_as::<_, Library>(
            r#"
            INSERT INTO libraries (alias, name, address, email)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&library.alias)
        .bind(&library.name)
        .bind(&library.address)
        .bind(&library.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
