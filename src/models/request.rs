//! Hold/request model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::RequestStatus;

/// A user's claim on a catalog entry, eventually bound to one physical copy
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Request {
    pub id: i32,
    pub user_id: i32,
    pub isbn: String,
    pub physical_book_id: Option<i32>,
    pub library_id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    /// Raw status column, see [`RequestStatus`]
    pub status: i16,
}

impl Request {
    pub fn status(&self) -> RequestStatus {
        RequestStatus::from(self.status)
    }
}

/// Request with catalog details for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestDetails {
    pub id: i32,
    pub isbn: String,
    pub title: String,
    pub library_alias: String,
    pub physical_book_id: Option<i32>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: RequestStatus,
    pub punishment_level: Option<i16>,
}

/// Create request (place a hold)
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRequest {
    pub user_id: i32,
    pub isbn: String,
    pub library_id: i32,
}
