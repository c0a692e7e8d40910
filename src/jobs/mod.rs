//! Scheduled jobs runner
//!
//! Owns the trigger cadence and the load/apply/persist loop around the
//! lifecycle rules. The three date-driven jobs (deadline check, pending
//! expiry, transfer expiry) fire once daily at a configured UTC time; the
//! waiting-list promotion job runs on a short interval to keep pickup
//! latency low.
//!
//! Entities are processed independently: one failed save is logged and
//! skipped, the batch continues, and the next run re-evaluates the same
//! date comparison. A run never overlaps itself: the next tick is computed
//! after the previous run finishes.

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, Utc};
use tokio::time::{sleep, Duration};

use crate::{
    config::JobsConfig,
    error::AppResult,
    lifecycle::{evaluate_pending, evaluate_requested, evaluate_transfer, promote_waiting},
    lifecycle::{DeadlineOutcome, ExpiryOutcome},
    models::enums::{RequestStatus, TransferStatus},
    repository::Repository,
    services::email::EmailService,
};

/// Per-run counters, logged at completion
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub processed: usize,
    pub changed: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct JobsRunner {
    repository: Repository,
    config: JobsConfig,
    email: EmailService,
}

impl JobsRunner {
    pub fn new(repository: Repository, config: JobsConfig, email: EmailService) -> Self {
        Self {
            repository,
            config,
            email,
        }
    }

    /// Spawn the background loops. Returns immediately; the tasks run for
    /// the lifetime of the process.
    pub fn spawn(self) {
        let runner = Arc::new(self);

        let daily = runner.clone();
        tokio::spawn(async move {
            let run_time = parse_run_time(&daily.config.daily_run_time);
            loop {
                let now = Utc::now();
                let next = next_daily_occurrence(now, run_time);
                let wait = (next - now).to_std().unwrap_or_default();
                tracing::info!(at = %next, "daily lifecycle jobs scheduled");
                sleep(wait).await;

                let now = Utc::now();
                if let Err(e) = daily.run_deadline_check(now).await {
                    tracing::error!("deadline check run failed: {}", e);
                }
                if let Err(e) = daily.run_pending_expiry(now).await {
                    tracing::error!("pending expiry run failed: {}", e);
                }
                if let Err(e) = daily.run_transfer_expiry(now).await {
                    tracing::error!("transfer expiry run failed: {}", e);
                }
            }
        });

        let promotion = runner.clone();
        tokio::spawn(async move {
            let period = Duration::from_secs(promotion.config.promotion_interval_secs.max(1));
            loop {
                sleep(period).await;
                if let Err(e) = promotion.run_waiting_promotion(Utc::now()).await {
                    tracing::error!("waiting promotion run failed: {}", e);
                }
            }
        });
    }

    /// Rule A: notices and punishment escalation for loans out on Requested
    /// requests.
    pub async fn run_deadline_check(&self, now: DateTime<Utc>) -> AppResult<RunReport> {
        tracing::info!("deadline check: run started");
        let requests = self
            .repository
            .requests
            .list_by_status(RequestStatus::Requested)
            .await?;

        let mut report = RunReport::default();
        for request in &requests {
            report.processed += 1;
            if request.end_date.is_none() {
                tracing::warn!(request_id = request.id, "requested request without end date, skipping");
                report.skipped += 1;
                continue;
            }

            let result = async {
                let title = self.repository.books.title_by_isbn(&request.isbn).await?;
                let punishment = self
                    .repository
                    .punishments
                    .get_for_request(request.id)
                    .await?;

                let outcome = evaluate_requested(
                    request,
                    punishment.as_ref(),
                    &title,
                    self.config.notice_window_days,
                    now,
                );
                match outcome {
                    DeadlineOutcome::Notice(notification) => {
                        self.repository.notifications.insert(&notification).await?;
                        self.email_return_notice(request.user_id, &title, request.end_date, now)
                            .await;
                        Ok::<bool, crate::error::AppError>(true)
                    }
                    DeadlineOutcome::IssuePunishment {
                        level,
                        reason,
                        notification,
                    } => {
                        self.repository
                            .punishments
                            .issue(request.id, &reason, level, &notification)
                            .await?;
                        Ok(true)
                    }
                    DeadlineOutcome::EscalatePunishment {
                        punishment_id,
                        new_level,
                        notification,
                    } => {
                        let applied = self
                            .repository
                            .punishments
                            .escalate(punishment_id, new_level, &notification)
                            .await?;
                        Ok(applied)
                    }
                    DeadlineOutcome::NoAction => Ok(false),
                }
            }
            .await;

            match result {
                Ok(true) => report.changed += 1,
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(request_id = request.id, "deadline check failed: {}", e);
                }
            }
        }

        tracing::info!(?report, "deadline check: run completed");
        Ok(report)
    }

    /// Rule B: cancel Pending requests whose pickup window closed.
    pub async fn run_pending_expiry(&self, now: DateTime<Utc>) -> AppResult<RunReport> {
        tracing::info!("pending expiry: run started");
        let requests = self
            .repository
            .requests
            .list_by_status(RequestStatus::Pending)
            .await?;

        let mut report = RunReport::default();
        for request in &requests {
            report.processed += 1;
            if request.physical_book_id.is_none() || request.end_date.is_none() {
                tracing::warn!(request_id = request.id, "pending request missing copy or deadline, skipping");
                report.skipped += 1;
                continue;
            }

            match evaluate_pending(request, now) {
                ExpiryOutcome::Cancel {
                    physical_book_id,
                    notification,
                } => {
                    match self
                        .repository
                        .requests
                        .cancel_expired_pending(request.id, physical_book_id, &notification)
                        .await
                    {
                        Ok(true) => report.changed += 1,
                        Ok(false) => report.skipped += 1,
                        Err(e) => {
                            report.failed += 1;
                            tracing::warn!(request_id = request.id, "pending expiry failed: {}", e);
                        }
                    }
                }
                ExpiryOutcome::NoAction => report.skipped += 1,
            }
        }

        tracing::info!(?report, "pending expiry: run completed");
        Ok(report)
    }

    /// Rule C: cancel Pending transfers past their deadline.
    pub async fn run_transfer_expiry(&self, now: DateTime<Utc>) -> AppResult<RunReport> {
        tracing::info!("transfer expiry: run started");
        let transfers = self
            .repository
            .transfers
            .list_by_status(TransferStatus::Pending)
            .await?;

        let mut report = RunReport::default();
        for transfer in &transfers {
            report.processed += 1;

            let result = async {
                let source = self
                    .repository
                    .libraries
                    .get_by_id(transfer.source_library_id)
                    .await?;
                match evaluate_transfer(transfer, &source.alias, now) {
                    ExpiryOutcome::Cancel {
                        physical_book_id,
                        notification,
                    } => {
                        self.repository
                            .transfers
                            .cancel_expired(transfer.id, physical_book_id, &notification)
                            .await
                    }
                    ExpiryOutcome::NoAction => Ok(false),
                }
            }
            .await;

            match result {
                Ok(true) => report.changed += 1,
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(transfer_id = transfer.id, "transfer expiry failed: {}", e);
                }
            }
        }

        tracing::info!(?report, "transfer expiry: run completed");
        Ok(report)
    }

    /// Rule D: bind freed copies to Waiting requests, oldest request first.
    pub async fn run_waiting_promotion(&self, now: DateTime<Utc>) -> AppResult<RunReport> {
        let requests = self
            .repository
            .requests
            .list_by_status(RequestStatus::Waiting)
            .await?;
        if requests.is_empty() {
            return Ok(RunReport::default());
        }
        tracing::info!(waiting = requests.len(), "waiting promotion: run started");

        let mut report = RunReport::default();
        for request in &requests {
            report.processed += 1;

            let result = async {
                let candidates = self
                    .repository
                    .physical_books
                    .list_shelved(&request.isbn, request.library_id)
                    .await?;
                let title = self.repository.books.title_by_isbn(&request.isbn).await?;

                let Some(promotion) = promote_waiting(
                    request,
                    &candidates,
                    &title,
                    self.config.pickup_window_days,
                    now,
                ) else {
                    return Ok(false);
                };

                let applied = self
                    .repository
                    .requests
                    .promote_waiting(
                        request.id,
                        promotion.physical_book_id,
                        promotion.pickup_deadline,
                        &promotion.notification,
                    )
                    .await?;
                if applied {
                    self.email_pickup_notice(request.user_id, &title).await;
                }
                Ok::<bool, crate::error::AppError>(applied)
            }
            .await;

            match result {
                Ok(true) => report.changed += 1,
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(request_id = request.id, "waiting promotion failed: {}", e);
                }
            }
        }

        tracing::info!(?report, "waiting promotion: run completed");
        Ok(report)
    }

    async fn email_return_notice(
        &self,
        user_id: i32,
        title: &str,
        end_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) {
        let Some(end_date) = end_date else { return };
        let days_left = crate::lifecycle::days_left(end_date, now);
        match self.repository.users.get_by_id(user_id).await {
            Ok(user) => {
                if let Err(e) = self.email.send_return_notice(&user.email, title, days_left).await {
                    tracing::warn!(user_id, "return notice email failed: {}", e);
                }
            }
            Err(e) => tracing::warn!(user_id, "user lookup for email failed: {}", e),
        }
    }

    async fn email_pickup_notice(&self, user_id: i32, title: &str) {
        match self.repository.users.get_by_id(user_id).await {
            Ok(user) => {
                if let Err(e) = self
                    .email
                    .send_pickup_notice(&user.email, title, self.config.pickup_window_days)
                    .await
                {
                    tracing::warn!(user_id, "pickup notice email failed: {}", e);
                }
            }
            Err(e) => tracing::warn!(user_id, "user lookup for email failed: {}", e),
        }
    }
}

/// Parse the configured "HH:MM" run time, falling back to 04:00 UTC on a
/// malformed value.
fn parse_run_time(raw: &str) -> NaiveTime {
    NaiveTime::parse_from_str(raw, "%H:%M").unwrap_or_else(|_| {
        tracing::warn!(raw, "invalid jobs.daily_run_time, using 04:00");
        NaiveTime::from_hms_opt(4, 0, 0).expect("static time")
    })
}

/// Next occurrence of `run_time` strictly after `now`.
fn next_daily_occurrence(now: DateTime<Utc>, run_time: NaiveTime) -> DateTime<Utc> {
    let today = now.date_naive().and_time(run_time).and_utc();
    if today > now {
        today
    } else {
        today + ChronoDuration::days(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn run_time_parsing() {
        assert_eq!(parse_run_time("04:30"), NaiveTime::from_hms_opt(4, 30, 0).unwrap());
        assert_eq!(parse_run_time("not a time"), NaiveTime::from_hms_opt(4, 0, 0).unwrap());
    }

    #[test]
    fn next_occurrence_rolls_to_tomorrow() {
        let run_time = NaiveTime::from_hms_opt(4, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 6, 15, 2, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap();

        assert_eq!(
            next_daily_occurrence(before, run_time),
            Utc.with_ymd_and_hms(2024, 6, 15, 4, 0, 0).unwrap()
        );
        assert_eq!(
            next_daily_occurrence(after, run_time),
            Utc.with_ymd_and_hms(2024, 6, 16, 4, 0, 0).unwrap()
        );
    }

    #[test]
    fn exact_run_time_schedules_tomorrow() {
        let run_time = NaiveTime::from_hms_opt(4, 0, 0).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 6, 15, 4, 0, 0).unwrap();
        assert_eq!(
            next_daily_occurrence(at, run_time),
            Utc.with_ymd_and_hms(2024, 6, 16, 4, 0, 0).unwrap()
        );
    }
}
