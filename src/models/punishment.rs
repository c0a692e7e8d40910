//! Punishment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::PunishmentLevel;

/// Escalating penalty attached to an overdue request. At most one per
/// request; the level only ever increases and saturates at Five.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Punishment {
    pub id: i32,
    pub request_id: i32,
    pub reason: String,
    /// Raw level column: 1..=5
    pub level: i16,
    pub emit_date: DateTime<Utc>,
}

impl Punishment {
    pub fn level(&self) -> PunishmentLevel {
        PunishmentLevel::from(self.level)
    }
}
