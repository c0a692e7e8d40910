//! Notifications repository for database operations

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::AppResult,
    models::{Notification, NotificationDraft},
};

/// Insert a notification inside a caller-owned transaction; used by the
/// lifecycle persistence methods so the record commits or rolls back with
/// the state change it documents.
pub async fn insert_notification_tx(
    tx: &mut Transaction<'_, Postgres>,
    draft: &NotificationDraft,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO notifications (title, description, emit_date, end_date, user_id, request_id, library_id, for_all)
        VALUES ($1, $2, NOW(), $3, $4, $5, $6, $7)
        "#,
    )
    .bind(&draft.title)
    .bind(&draft.description)
    .bind(draft.end_date)
    .bind(draft.user_id)
    .bind(draft.request_id)
    .bind(draft.library_id)
    .bind(draft.for_all)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[derive(Clone)]
pub struct NotificationsRepository {
    pool: Pool<Postgres>,
}

impl NotificationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a standalone notification
    pub async fn insert(&self, draft: &NotificationDraft) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        insert_notification_tx(&mut tx, draft).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Unexpired notifications addressed to a user, plus broadcasts
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE (user_id = $1 OR for_all)
              AND (end_date IS NULL OR end_date > NOW())
            ORDER BY emit_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notifications)
    }

    /// Unexpired notifications addressed to a branch
    pub async fn list_for_library(&self, library_id: i32) -> AppResult<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE library_id = $1
              AND (end_date IS NULL OR end_date > NOW())
            ORDER BY emit_date DESC
            "#,
        )
        .bind(library_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notifications)
    }
}
