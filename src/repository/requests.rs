//! Requests (holds) repository for database operations
//!
//! The job-facing methods here update status with a `WHERE status = expected`
//! guard inside one short transaction, so a racing API write (a librarian
//! marking a copy returned while a job evaluates it) cannot be clobbered.
//! A guard miss returns `Ok(false)` and the caller simply moves on.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{PhysicalBookStatus, RequestStatus},
        request::RequestDetails,
        NotificationDraft, Request,
    },
};

use super::notifications::insert_notification_tx;

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get request by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Request> {
        sqlx::query_as::<_, Request>("SELECT * FROM requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request with id {} not found", id)))
    }

    /// Working set for the scheduled jobs: every request in one status
    pub async fn list_by_status(&self, status: RequestStatus) -> AppResult<Vec<Request>> {
        let requests = sqlx::query_as::<_, Request>(
            "SELECT * FROM requests WHERE status = $1 ORDER BY id",
        )
        .bind(i16::from(status))
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    /// List a user's requests with catalog details, newest first
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<RequestDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.isbn, r.physical_book_id, r.start_date, r.end_date, r.status,
                   b.title, l.alias AS library_alias, p.level AS punishment_level
            FROM requests r
            JOIN generic_books b ON b.isbn = r.isbn
            JOIN libraries l ON l.id = r.library_id
            LEFT JOIN punishments p ON p.request_id = r.id
            WHERE r.user_id = $1
            ORDER BY r.start_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            result.push(RequestDetails {
                id: row.get("id"),
                isbn: row.get("isbn"),
                title: row.get("title"),
                library_alias: row.get("library_alias"),
                physical_book_id: row.get("physical_book_id"),
                start_date: row.get("start_date"),
                end_date: row.get("end_date"),
                status: RequestStatus::from(row.get::<i16, _>("status")),
                punishment_level: row.get("punishment_level"),
            });
        }
        Ok(result)
    }

    /// Does the user already hold an open request on this catalog entry?
    pub async fn open_request_exists(&self, user_id: i32, isbn: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM requests WHERE user_id = $1 AND isbn = $2 AND status IN (0, 1, 4))",
        )
        .bind(user_id)
        .bind(isbn)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Insert a new request. `physical_book_id`/`end_date` are set when the
    /// hold starts Pending (a copy was free at creation time).
    pub async fn create(
        &self,
        user_id: i32,
        isbn: &str,
        library_id: i32,
        physical_book_id: Option<i32>,
        end_date: Option<DateTime<Utc>>,
        status: RequestStatus,
    ) -> AppResult<Request> {
        let request = sqlx::query_as::<_, Request>(
            r#"
            INSERT INTO requests (user_id, isbn, library_id, physical_book_id, start_date, end_date, status)
            VALUES ($1, $2, $3, $4, NOW(), $5, $6)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(isbn)
        .bind(library_id)
        .bind(physical_book_id)
        .bind(end_date)
        .bind(i16::from(status))
        .fetch_one(&self.pool)
        .await?;
        Ok(request)
    }

    /// Guarded status flip with a new end date (pickup confirmation)
    pub async fn set_status(
        &self,
        id: i32,
        from: RequestStatus,
        to: RequestStatus,
        end_date: Option<DateTime<Utc>>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE requests SET status = $1, end_date = COALESCE($2, end_date) WHERE id = $3 AND status = $4",
        )
        .bind(i16::from(to))
        .bind(end_date)
        .bind(id)
        .bind(i16::from(from))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Rule B persistence: cancel an expired Pending request, put its copy
    /// back on the shelf and record the notification, atomically.
    pub async fn cancel_expired_pending(
        &self,
        request_id: i32,
        physical_book_id: i32,
        notification: &NotificationDraft,
    ) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE requests SET status = $1 WHERE id = $2 AND status = $3")
            .bind(i16::from(RequestStatus::Canceled))
            .bind(request_id)
            .bind(i16::from(RequestStatus::Pending))
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() != 1 {
            // Someone else moved the request since we loaded it.
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

    /// Rule D persistence: bind a freed copy to a Waiting request and record
    /// the pickup notification, atomically. The copy-side guard makes two
    /// concurrent promotions of the same copy impossible.
    pub async fn promote_waiting(
        &self,
        request_id: i32,
        physical_book_id: i32,
        pickup_deadline: DateTime<Utc>,
        notification: &NotificationDraft,
    ) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let copy = sqlx::query("UPDATE physical_books SET status = $1 WHERE id = $2 AND status = $3")
            .bind(i16::from(PhysicalBookStatus::Requested))
            .bind(physical_book_id)
            .bind(i16::from(PhysicalBookStatus::AtLibrary))
            .execute(&mut *tx)
            .await?;
        if copy.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(false);
        }

        let request = sqlx::query(
            r#"
            UPDATE requests SET status = $1, physical_book_id = $2, end_date = $3
            WHERE id = $4 AND status = $5
            "#,
        )
        .bind(i16::from(RequestStatus::Pending))
        .bind(physical_book_id)
        .bind(pickup_deadline)
        .bind(request_id)
        .bind(i16::from(RequestStatus::Waiting))
        .execute(&mut *tx)
        .await?;
        if request.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(false);
        }

        insert_notification_tx(&mut tx, notification).await?;
        tx.commit().await?;
        Ok(true)
    }

    /// Close a loan: request becomes Returned (or NotReturned), the copy
    /// goes back on the shelf when it physically came back.
    pub async fn close(
        &self,
        request_id: i32,
        physical_book_id: Option<i32>,
        outcome: RequestStatus,
        copy_returned: bool,
    ) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE requests SET status = $1 WHERE id = $2 AND status IN ($3, $4)",
        )
        .bind(i16::from(outcome))
        .bind(request_id)
        .bind(i16::from(RequestStatus::Requested))
        .bind(i16::from(RequestStatus::NotReturned))
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(false);
        }

        if copy_returned {
            if let Some(copy_id) = physical_book_id {
                sqlx::query("UPDATE physical_books SET status = $1 WHERE id = $2")
                    .bind(i16::from(PhysicalBookStatus::AtLibrary))
                    .bind(copy_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Count requests in the open states
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM requests WHERE status IN (0, 1, 4)")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Count Requested requests past their end date
    pub async fn count_overdue(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM requests WHERE status = 1 AND end_date < NOW()",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
