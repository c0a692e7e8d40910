//! Library (branch) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Library branch from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Library {
    pub id: i32,
    /// Short code used in notifications and transfer slips
    pub alias: String,
    pub name: String,
    pub address: Option<String>,
    pub email: Option<String>,
}

/// Create library request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLibrary {
    #[validate(length(min = 2, max = 16))]
    pub alias: String,
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub address: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}
