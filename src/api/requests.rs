//! Request (hold) endpoints: the user-driven edges of the lifecycle

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::request::{CreateRequest, Request, RequestDetails},
    AppState,
};

use super::AuthenticatedUser;

/// Return request body
#[derive(Deserialize, ToSchema)]
pub struct ReturnRequest {
    /// False records a write-off instead of a normal return
    pub copy_returned: Option<bool>,
}

/// List a user's requests
#[utoipa::path(
    get,
    path = "/users/{id}/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User's requests", body = Vec<RequestDetails>),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_user_requests(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<RequestDetails>>> {
    claims.require_self_or_staff(user_id)?;
    let requests = state.services.requests.list_for_user(user_id).await?;
    Ok(Json(requests))
}

/// Place a hold on a catalog entry
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    request_body = CreateRequest,
    responses(
        (status = 201, description = "Request created (Waiting or Pending)", body = Request),
        (status = 422, description = "User already has an open request")
    )
)]
pub async fn create_request(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(body): Json<CreateRequest>,
) -> AppResult<(StatusCode, Json<Request>)> {
    claims.require_self_or_staff(body.user_id)?;
    let request = state.services.requests.create(&body).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// Confirm pickup of a reserved copy (Pending -> Requested)
#[utoipa::path(
    post,
    path = "/requests/{id}/pickup",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Loan started", body = Request),
        (status = 422, description = "Request not awaiting pickup")
    )
)]
pub async fn confirm_pickup(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Request>> {
    let request = state.services.requests.get(id).await?;
    claims.require_self_or_staff(request.user_id)?;
    let request = state.services.requests.confirm_pickup(id).await?;
    Ok(Json(request))
}

/// Return a borrowed copy (Requested -> Returned)
#[utoipa::path(
    post,
    path = "/requests/{id}/return",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Loan closed", body = Request),
        (status = 422, description = "Nothing to return")
    )
)]
pub async fn return_request(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    body: Option<Json<ReturnRequest>>,
) -> AppResult<Json<Request>> {
    // Returns are recorded at the desk, by staff.
    claims.require_staff()?;
    let copy_returned = body
        .and_then(|Json(b)| b.copy_returned)
        .unwrap_or(true);
    let request = state.services.requests.close(id, copy_returned).await?;
    Ok(Json(request))
}

/// Cancel a hold before it becomes a loan
#[utoipa::path(
    post,
    path = "/requests/{id}/cancel",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request canceled", body = Request),
        (status = 422, description = "Request cannot be canceled")
    )
)]
pub async fn cancel_request(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Request>> {
    let request = state.services.requests.get(id).await?;
    claims.require_self_or_staff(request.user_id)?;
    let request = state.services.requests.cancel(id).await?;
    Ok(Json(request))
}
