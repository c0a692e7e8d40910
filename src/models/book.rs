//! Catalog entry (generic book) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Bibliographic record shared by every physical copy with the same ISBN
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct GenericBook {
    pub id: i32,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub category: Option<String>,
    pub language: Option<String>,
    pub synopsis: Option<String>,
    pub cover_url: Option<String>,
}

/// Catalog entry with per-branch availability, for listing screens
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenericBookDetails {
    #[serde(flatten)]
    pub book: GenericBook,
    /// Copies across all branches
    pub nb_copies: i64,
    /// Copies currently AtLibrary
    pub nb_available: i64,
    /// Average evaluation rating, if any
    pub rating: Option<f64>,
}

/// Create catalog entry request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGenericBook {
    #[validate(length(min = 10, max = 13))]
    pub isbn: String,
    #[validate(length(min = 1, max = 256))]
    pub title: String,
    #[validate(length(min = 1, max = 128))]
    pub author: String,
    pub category: Option<String>,
    pub language: Option<String>,
    pub synopsis: Option<String>,
    pub cover_url: Option<String>,
}

/// Catalog search filters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookQuery {
    /// Substring match on the title
    pub title: Option<String>,
    /// Exact ISBN match
    pub isbn: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
