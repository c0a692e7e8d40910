//! Transfers repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{PhysicalBookStatus, TransferStatus},
        NotificationDraft, Transfer,
    },
};

use super::notifications::insert_notification_tx;

#[derive(Clone)]
pub struct TransfersRepository {
    pool: Pool<Postgres>,
}

impl TransfersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get transfer by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Transfer> {
        sqlx::query_as::<_, Transfer>("SELECT * FROM transfers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Transfer with id {} not found", id)))
    }

    /// Working set for the expiry job
    pub async fn list_by_status(&self, status: TransferStatus) -> AppResult<Vec<Transfer>> {
        let transfers =
            sqlx::query_as::<_, Transfer>("SELECT * FROM transfers WHERE status = $1 ORDER BY id")
                .bind(i16::from(status))
                .fetch_all(&self.pool)
                .await?;
        Ok(transfers)
    }

    /// Transfers touching a branch, as source or destination
    pub async fn list_for_library(&self, library_id: i32) -> AppResult<Vec<Transfer>> {
        let transfers = sqlx::query_as::<_, Transfer>(
            r#"
            SELECT * FROM transfers
            WHERE source_library_id = $1 OR destination_library_id = $1
            ORDER BY start_date DESC
            "#,
        )
        .bind(library_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(transfers)
    }

    /// Open a transfer: the copy leaves the shelf and the transfer starts
    /// Pending, atomically. Fails if the copy is not AtLibrary.
    pub async fn create(
        &self,
        source_library_id: i32,
        destination_library_id: i32,
        physical_book_id: i32,
        end_date: DateTime<Utc>,
    ) -> AppResult<Transfer> {
        let mut tx = self.pool.begin().await?;

        let copy = sqlx::query("UPDATE physical_books SET status = $1 WHERE id = $2 AND status = $3")
            .bind(i16::from(PhysicalBookStatus::Transfer))
            .bind(physical_book_id)
            .bind(i16::from(PhysicalBookStatus::AtLibrary))
            .execute(&mut *tx)
            .await?;
        if copy.rows_affected() != 1 {
            tx.rollback().await?;
            return Err(AppError::BusinessRule(
                "Copy is not available for transfer".to_string(),
            ));
        }

        let transfer = sqlx::query_as::<_, Transfer>(
            r#"
            INSERT INTO transfers (source_library_id, destination_library_id, physical_book_id, start_date, end_date, status)
            VALUES ($1, $2, $3, NOW(), $4, $5)
            RETURNING *
            "#,
        )
        .bind(source_library_id)
        .bind(destination_library_id)
        .bind(physical_book_id)
        .bind(end_date)
        .bind(i16::from(TransferStatus::Pending))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(transfer)
    }

    /// Accept: the copy changes branch and goes back on a shelf
    pub async fn accept(&self, transfer: &Transfer) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE transfers SET status = $1 WHERE id = $2 AND status = $3")
            .bind(i16::from(TransferStatus::Accepted))
            .bind(transfer.id)
            .bind(i16::from(TransferStatus::Pending))
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE physical_books SET status = $1, library_id = $2 WHERE id = $3")
            .bind(i16::from(PhysicalBookStatus::AtLibrary))
            .bind(transfer.destination_library_id)
            .bind(transfer.physical_book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Reject or cancel: the copy stays at (or returns to) the source shelf
    pub async fn close(&self, transfer: &Transfer, outcome: TransferStatus) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE transfers SET status = $1 WHERE id = $2 AND status = $3")
            .bind(i16::from(outcome))
            .bind(transfer.id)
            .bind(i16::from(TransferStatus::Pending))
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE physical_books SET status = $1 WHERE id = $2")
            .bind(i16::from(PhysicalBookStatus::AtLibrary))
            .bind(transfer.physical_book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Rule C persistence: cancel an expired Pending transfer, free the copy
    /// and record the destination-branch notification, atomically.
    pub async fn cancel_expired(
        &self,
        transfer_id: i32,
        physical_book_id: i32,
        notification: &NotificationDraft,
    ) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE transfers SET status = $1 WHERE id = $2 AND status = $3")
            .bind(i16::from(TransferStatus::Canceled))
            .bind(transfer_id)
            .bind(i16::from(TransferStatus::Pending))
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE physical_books SET status = $1 WHERE id = $2")
            .bind(i16::from(PhysicalBookStatus::AtLibrary))
            .bind(physical_book_id)
            .execute(&mut *tx)
            .await?;

        insert_notification_tx(&mut tx, notification).await?;
        tx.commit().await?;
        Ok(true)
    }

    /// Count transfers awaiting acceptance
    pub async fn count_pending(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transfers WHERE status = 0")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
