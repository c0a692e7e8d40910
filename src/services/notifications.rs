//! Notifications service

use crate::{error::AppResult, models::Notification, repository::Repository};

#[derive(Clone)]
pub struct NotificationsService {
    repository: Repository,
}

impl NotificationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Unexpired notifications for a user, targeted and broadcast
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Notification>> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.notifications.list_for_user(user_id).await
    }

    /// Unexpired notifications addressed to a branch
    pub async fn list_for_library(&self, library_id: i32) -> AppResult<Vec<Notification>> {
        self.repository.libraries.get_by_id(library_id).await?;
        self.repository
            .notifications
            .list_for_library(library_id)
            .await
    }
}
