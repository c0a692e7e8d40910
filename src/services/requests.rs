//! Requests service: the API-driven edges of the request state machine
//!
//! The scheduled jobs own the date-driven transitions; everything here is
//! user-initiated: placing a hold, confirming pickup, returning a copy,
//! canceling.

use chrono::{Duration, Utc};

use crate::{
    config::JobsConfig,
    error::{AppError, AppResult},
    lifecycle::promote_waiting,
    models::{
        enums::RequestStatus,
        notification,
        request::{CreateRequest, Request, RequestDetails},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
    config: JobsConfig,
}

impl RequestsService {
    pub fn new(repository: Repository, config: JobsConfig) -> Self {
        Self { repository, config }
    }

    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<RequestDetails>> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.requests.list_for_user(user_id).await
    }

    pub async fn get(&self, id: i32) -> AppResult<Request> {
        self.repository.requests.get_by_id(id).await
    }

    /// Place a hold. If a copy is shelved at the branch right now the hold
    /// starts Pending with a pickup window (same binding as the promotion
    /// job); otherwise it queues as Waiting.
    pub async fn create(&self, create: &CreateRequest) -> AppResult<Request> {
        self.repository.users.get_by_id(create.user_id).await?;
        self.repository.books.get_by_isbn(&create.isbn).await?;
        self.repository.libraries.get_by_id(create.library_id).await?;

        if self
            .repository
            .requests
            .open_request_exists(create.user_id, &create.isbn)
            .await?
        {
            return Err(AppError::BusinessRule(
                "User already has an open request for this book".to_string(),
            ));
        }

        // Queue first, then try to bind immediately so the copy-side guard
        // in promote_waiting covers the race against the promotion job.
        let request = self
            .repository
            .requests
            .create(
                create.user_id,
                &create.isbn,
                create.library_id,
                None,
                None,
                RequestStatus::Waiting,
            )
            .await?;

        let candidates = self
            .repository
            .physical_books
            .list_shelved(&create.isbn, create.library_id)
            .await?;
        let title = self.repository.books.title_by_isbn(&create.isbn).await?;
        let now = Utc::now();

        if let Some(promotion) =
            promote_waiting(&request, &candidates, &title, self.config.pickup_window_days, now)
        {
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
                return self.repository.requests.get_by_id(request.id).await;
            }
        }

        Ok(request)
    }

    /// Pickup confirmation: Pending becomes Requested and the loan period
    /// starts.
    pub async fn confirm_pickup(&self, request_id: i32) -> AppResult<Request> {
        let request = self.repository.requests.get_by_id(request_id).await?;
        if request.status() != RequestStatus::Pending {
            return Err(AppError::BusinessRule(format!(
                "Request is {}, not awaiting pickup",
                request.status()
            )));
        }

        let due = Utc::now() + Duration::days(self.config.loan_period_days);
        let applied = self
            .repository
            .requests
            .set_status(request_id, RequestStatus::Pending, RequestStatus::Requested, Some(due))
            .await?;
        if !applied {
            return Err(AppError::Conflict(
                "Request changed state concurrently".to_string(),
            ));
        }
        self.repository.requests.get_by_id(request_id).await
    }

    /// Return: closes the loan, frees the copy. `copy_returned = false`
    /// records a write-off (NotReturned) instead.
    pub async fn close(&self, request_id: i32, copy_returned: bool) -> AppResult<Request> {
        let request = self.repository.requests.get_by_id(request_id).await?;
        if !matches!(
            request.status(),
            RequestStatus::Requested | RequestStatus::NotReturned
        ) {
            return Err(AppError::BusinessRule(format!(
                "Request is {}, nothing to return",
                request.status()
            )));
        }

        let outcome = if copy_returned {
            RequestStatus::Returned
        } else {
            RequestStatus::NotReturned
        };
        let applied = self
            .repository
            .requests
            .close(request_id, request.physical_book_id, outcome, copy_returned)
            .await?;
        if !applied {
            return Err(AppError::Conflict(
                "Request changed state concurrently".to_string(),
            ));
        }
        self.repository.requests.get_by_id(request_id).await
    }

    /// User-initiated cancellation of a hold that has not become a loan.
    pub async fn cancel(&self, request_id: i32) -> AppResult<Request> {
        let request = self.repository.requests.get_by_id(request_id).await?;
        match request.status() {
            RequestStatus::Waiting => {
                let applied = self
                    .repository
                    .requests
                    .set_status(request_id, RequestStatus::Waiting, RequestStatus::Canceled, None)
                    .await?;
                if !applied {
                    return Err(AppError::Conflict(
                        "Request changed state concurrently".to_string(),
                    ));
                }
            }
            RequestStatus::Pending => {
                let copy_id = request.physical_book_id.ok_or_else(|| {
                    AppError::Internal("Pending request without a bound copy".to_string())
                })?;
                let notification =
                    notification::request_canceled(request.user_id, request.id, &request.isbn);
                let applied = self
                    .repository
                    .requests
                    .cancel_expired_pending(request_id, copy_id, &notification)
                    .await?;
                if !applied {
                    return Err(AppError::Conflict(
                        "Request changed state concurrently".to_string(),
                    ));
                }
            }
            status => {
                return Err(AppError::BusinessRule(format!(
                    "Request is {}, it cannot be canceled",
                    status
                )));
            }
        }

        self.repository.requests.get_by_id(request_id).await
    }
}
