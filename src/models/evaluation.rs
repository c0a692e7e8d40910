//! Evaluation (reader rating) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// One reader's rating of a catalog entry; one per user and ISBN
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Evaluation {
    pub id: i32,
    pub user_id: i32,
    pub isbn: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub emit_date: DateTime<Utc>,
}

/// Create evaluation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEvaluation {
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
    #[validate(length(max = 2048))]
    pub comment: Option<String>,
}
