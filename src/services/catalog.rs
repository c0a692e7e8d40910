//! Catalog service: generic books, physical copies and evaluations

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookQuery, CreateGenericBook, GenericBook, GenericBookDetails},
        evaluation::{CreateEvaluation, Evaluation},
        PhysicalBook,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_books(&self, query: &BookQuery) -> AppResult<Vec<GenericBookDetails>> {
        self.repository.books.list(query).await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<GenericBook> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn create_book(&self, book: &CreateGenericBook) -> AppResult<GenericBook> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.books.create(book).await
    }

    /// List all copies of a catalog entry
    pub async fn list_copies(&self, book_id: i32) -> AppResult<Vec<PhysicalBook>> {
        let book = self.repository.books.get_by_id(book_id).await?;
        self.repository.physical_books.list_for_isbn(&book.isbn).await
    }

    /// Add a copy of a catalog entry to a branch
    pub async fn create_copy(&self, book_id: i32, library_id: i32) -> AppResult<PhysicalBook> {
        let book = self.repository.books.get_by_id(book_id).await?;
        // Branch must exist before shelving a copy there
        self.repository.libraries.get_by_id(library_id).await?;
        self.repository
            .physical_books
            .create(&book.isbn, library_id)
            .await
    }

    pub async fn list_evaluations(&self, book_id: i32) -> AppResult<Vec<Evaluation>> {
        let book = self.repository.books.get_by_id(book_id).await?;
        self.repository.evaluations.list_for_isbn(&book.isbn).await
    }

    /// Record or replace the caller's rating of a catalog entry
    pub async fn evaluate(
        &self,
        user_id: i32,
        book_id: i32,
        evaluation: &CreateEvaluation,
    ) -> AppResult<Evaluation> {
        evaluation
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let book = self.repository.books.get_by_id(book_id).await?;
        self.repository
            .evaluations
            .upsert(
                user_id,
                &book.isbn,
                evaluation.rating,
                evaluation.comment.as_deref(),
            )
            .await
    }
}
