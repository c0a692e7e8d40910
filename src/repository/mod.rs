//! Repository layer for database operations

pub mod books;
pub mod evaluations;
pub mod libraries;
pub mod notifications;
pub mod physical_books;
pub mod punishments;
pub mod requests;
pub mod transfers;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub physical_books: physical_books::PhysicalBooksRepository,
    pub libraries: libraries::LibrariesRepository,
    pub users: users::UsersRepository,
    pub requests: requests::RequestsRepository,
    pub punishments: punishments::PunishmentsRepository,
    pub transfers: transfers::TransfersRepository,
    pub notifications: notifications::NotificationsRepository,
    pub evaluations: evaluations::EvaluationsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            physical_books: physical_books::PhysicalBooksRepository::new(pool.clone()),
            libraries: libraries::LibrariesRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            requests: requests::RequestsRepository::new(pool.clone()),
            punishments: punishments::PunishmentsRepository::new(pool.clone()),
            transfers: transfers::TransfersRepository::new(pool.clone()),
            notifications: notifications::NotificationsRepository::new(pool.clone()),
            evaluations: evaluations::EvaluationsRepository::new(pool.clone()),
            pool,
        }
    }
}
