//! Punishments repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{NotificationDraft, Punishment, PunishmentLevel},
};

use super::notifications::insert_notification_tx;

#[derive(Clone)]
pub struct PunishmentsRepository {
    pool: Pool<Postgres>,
}

impl PunishmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// The punishment attached to a request, if any (at most one)
    pub async fn get_for_request(&self, request_id: i32) -> AppResult<Option<Punishment>> {
        let punishment =
            sqlx::query_as::<_, Punishment>("SELECT * FROM punishments WHERE request_id = $1")
                .bind(request_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(punishment)
    }

    /// Issue a first punishment and record its notification, atomically.
    /// The unique index on request_id turns a concurrent double-issue into
    /// a rollback rather than a duplicate.
    pub async fn issue(
        &self,
        request_id: i32,
        reason: &str,
        level: PunishmentLevel,
        notification: &NotificationDraft,
    ) -> AppResult<Punishment> {
        let mut tx = self.pool.begin().await?;

        let punishment = sqlx::query_as::<_, Punishment>(
            r#"
            INSERT INTO punishments (request_id, reason, level, emit_date)
            VALUES ($1, $2, $3, NOW())
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(reason)
        .bind(i16::from(level))
        .fetch_one(&mut *tx)
        .await?;

        insert_notification_tx(&mut tx, notification).await?;
        tx.commit().await?;
        Ok(punishment)
    }

    /// Raise the level of an existing punishment and record the escalation
    /// notification. The `level < $new` guard keeps the level monotonic even
    /// if two runs overlap; a guard miss skips the notification too.
    pub async fn escalate(
        &self,
        punishment_id: i32,
        new_level: PunishmentLevel,
        notification: &NotificationDraft,
    ) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE punishments SET level = $1, emit_date = NOW() WHERE id = $2 AND level < $1",
        )
        .bind(i16::from(new_level))
        .bind(punishment_id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(false);
        }

        insert_notification_tx(&mut tx, notification).await?;
        tx.commit().await?;
        Ok(true)
    }
}
