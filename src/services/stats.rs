//! Dashboard statistics service

use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, repository::Repository};

/// Headline counts for the staff dashboard
#[derive(Debug, Serialize, ToSchema)]
pub struct Stats {
    pub active_requests: i64,
    pub overdue_requests: i64,
    pub pending_transfers: i64,
    pub registered_users: i64,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_stats(&self) -> AppResult<Stats> {
        Ok(Stats {
            active_requests: self.repository.requests.count_active().await?,
            overdue_requests: self.repository.requests.count_overdue().await?,
            pending_transfers: self.repository.transfers.count_pending().await?,
            registered_users: self.repository.users.count().await?,
        })
    }
}
