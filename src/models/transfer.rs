//! Inter-branch transfer model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::TransferStatus;

/// Movement of one physical copy between two branches
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Transfer {
    pub id: i32,
    pub source_library_id: i32,
    pub destination_library_id: i32,
    pub physical_book_id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Raw status column, see [`TransferStatus`]
    pub status: i16,
}

impl Transfer {
    pub fn status(&self) -> TransferStatus {
        TransferStatus::from(self.status)
    }
}

/// Create transfer request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTransfer {
    pub destination_library_id: i32,
    pub physical_book_id: i32,
    /// Days before the pending transfer expires; server default applies
    /// when absent
    pub deadline_days: Option<i64>,
}
