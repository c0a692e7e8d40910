//! Athenaeum Library Management System
//!
//! A multi-branch library management server: REST JSON API for catalogs,
//! holds, inter-branch transfers and punishments, plus scheduled background
//! jobs that advance the request/transfer/punishment lifecycles.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod jobs;
pub mod lifecycle;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repository: repository::Repository,
    pub services: Arc<services::Services>,
}
