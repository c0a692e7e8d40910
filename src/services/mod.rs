//! Business logic services

pub mod auth;
pub mod catalog;
pub mod email;
pub mod notifications;
pub mod requests;
pub mod stats;
pub mod transfers;

use crate::{
    config::{AuthConfig, EmailConfig, JobsConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub requests: requests::RequestsService,
    pub transfers: transfers::TransfersService,
    pub notifications: notifications::NotificationsService,
    pub stats: stats::StatsService,
    pub email: email::EmailService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        email_config: EmailConfig,
        jobs_config: JobsConfig,
    ) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            requests: requests::RequestsService::new(repository.clone(), jobs_config.clone()),
            transfers: transfers::TransfersService::new(repository.clone(), jobs_config),
            notifications: notifications::NotificationsService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
            email: email::EmailService::new(email_config),
        }
    }
}
