//! Physical copy model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::PhysicalBookStatus;

/// One physical copy of a catalog entry, shelved at exactly one branch
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PhysicalBook {
    pub id: i32,
    pub library_id: i32,
    pub isbn: String,
    /// Raw status column: 0=AtLibrary, 1=Requested, 2=Transfer
    pub status: i16,
    pub crea_date: Option<DateTime<Utc>>,
}

impl PhysicalBook {
    pub fn status(&self) -> PhysicalBookStatus {
        PhysicalBookStatus::from(self.status)
    }
}

/// Create physical copy request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePhysicalBook {
    pub library_id: i32,
}
