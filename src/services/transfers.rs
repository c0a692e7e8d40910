//! Transfers service: moving copies between branches

use chrono::{Duration, Utc};

use crate::{
    config::JobsConfig,
    error::{AppError, AppResult},
    models::{
        enums::{PhysicalBookStatus, TransferStatus},
        transfer::{CreateTransfer, Transfer},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct TransfersService {
    repository: Repository,
    config: JobsConfig,
}

impl TransfersService {
    pub fn new(repository: Repository, config: JobsConfig) -> Self {
        Self { repository, config }
    }

    pub async fn get(&self, id: i32) -> AppResult<Transfer> {
        self.repository.transfers.get_by_id(id).await
    }

    pub async fn list_for_library(&self, library_id: i32) -> AppResult<Vec<Transfer>> {
        self.repository.libraries.get_by_id(library_id).await?;
        self.repository.transfers.list_for_library(library_id).await
    }

    /// Open a transfer of one shelved copy towards another branch
    pub async fn create(&self, create: &CreateTransfer) -> AppResult<Transfer> {
        let copy = self
            .repository
            .physical_books
            .get_by_id(create.physical_book_id)
            .await?;
        let destination = self
            .repository
            .libraries
            .get_by_id(create.destination_library_id)
            .await?;

        if copy.library_id == destination.id {
            return Err(AppError::BadRequest(
                "Copy is already at the destination library".to_string(),
            ));
        }
        if copy.status() != PhysicalBookStatus::AtLibrary {
            return Err(AppError::BusinessRule(
                "Copy is not available for transfer".to_string(),
            ));
        }

        let deadline_days = create
            .deadline_days
            .unwrap_or(self.config.transfer_deadline_days)
            .max(1);
        let end_date = Utc::now() + Duration::days(deadline_days);

        self.repository
            .transfers
            .create(copy.library_id, destination.id, copy.id, end_date)
            .await
    }

    /// Destination accepts: the copy changes branch
    pub async fn accept(&self, transfer_id: i32) -> AppResult<Transfer> {
        let transfer = self.repository.transfers.get_by_id(transfer_id).await?;
        self.require_pending(&transfer)?;
        let applied = self.repository.transfers.accept(&transfer).await?;
        if !applied {
            return Err(AppError::Conflict(
                "Transfer changed state concurrently".to_string(),
            ));
        }
        self.repository.transfers.get_by_id(transfer_id).await
    }

    /// Destination rejects: the copy stays at the source
    pub async fn reject(&self, transfer_id: i32) -> AppResult<Transfer> {
        self.close(transfer_id, TransferStatus::Rejected).await
    }

    /// Source cancels before acceptance
    pub async fn cancel(&self, transfer_id: i32) -> AppResult<Transfer> {
        self.close(transfer_id, TransferStatus::Canceled).await
    }

    async fn close(&self, transfer_id: i32, outcome: TransferStatus) -> AppResult<Transfer> {
        let transfer = self.repository.transfers.get_by_id(transfer_id).await?;
        self.require_pending(&transfer)?;
        let applied = self.repository.transfers.close(&transfer, outcome).await?;
        if !applied {
            return Err(AppError::Conflict(
                "Transfer changed state concurrently".to_string(),
            ));
        }
        self.repository.transfers.get_by_id(transfer_id).await
    }

    fn require_pending(&self, transfer: &Transfer) -> AppResult<()> {
        if transfer.status() != TransferStatus::Pending {
            return Err(AppError::BusinessRule(
                "Transfer is no longer pending".to_string(),
            ));
        }
        Ok(())
    }
}
