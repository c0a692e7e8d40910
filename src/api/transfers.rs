//! Transfer endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::transfer::{CreateTransfer, Transfer},
    AppState,
};

use super::AuthenticatedUser;

/// List transfers touching a branch
#[utoipa::path(
    get,
    path = "/libraries/{id}/transfers",
    tag = "transfers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Library ID")),
    responses(
        (status = 200, description = "Transfers", body = Vec<Transfer>),
        (status = 404, description = "Library not found")
    )
)]
pub async fn list_library_transfers(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(library_id): Path<i32>,
) -> AppResult<Json<Vec<Transfer>>> {
    claims.require_staff()?;
    let transfers = state.services.transfers.list_for_library(library_id).await?;
    Ok(Json(transfers))
}

/// Open a transfer of a shelved copy to another branch
#[utoipa::path(
    post,
    path = "/transfers",
    tag = "transfers",
    security(("bearer_auth" = [])),
    request_body = CreateTransfer,
    responses(
        (status = 201, description = "Transfer opened", body = Transfer),
        (status = 422, description = "Copy not available")
    )
)]
pub async fn create_transfer(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(body): Json<CreateTransfer>,
) -> AppResult<(StatusCode, Json<Transfer>)> {
    claims.require_staff()?;
    let transfer = state.services.transfers.create(&body).await?;
    Ok((StatusCode::CREATED, Json(transfer)))
}

/// Accept a pending transfer; the copy changes branch
#[utoipa::path(
    post,
    path = "/transfers/{id}/accept",
    tag = "transfers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Transfer ID")),
    responses(
        (status = 200, description = "Transfer accepted", body = Transfer),
        (status = 422, description = "Transfer no longer pending")
    )
)]
pub async fn accept_transfer(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Transfer>> {
    claims.require_staff()?;
    let transfer = state.services.transfers.accept(id).await?;
    Ok(Json(transfer))
}

/// Reject a pending transfer; the copy stays at the source
#[utoipa::path(
    post,
    path = "/transfers/{id}/reject",
    tag = "transfers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Transfer ID")),
    responses(
        (status = 200, description = "Transfer rejected", body = Transfer),
        (status = 422, description = "Transfer no longer pending")
    )
)]
pub async fn reject_transfer(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Transfer>> {
    claims.require_staff()?;
    let transfer = state.services.transfers.reject(id).await?;
    Ok(Json(transfer))
}

/// Cancel a pending transfer from the source side
#[utoipa::path(
    post,
    path = "/transfers/{id}/cancel",
    tag = "transfers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Transfer ID")),
    responses(
        (status = 200, description = "Transfer canceled", body = Transfer),
        (status = 422, description = "Transfer no longer pending")
    )
)]
pub async fn cancel_transfer(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Transfer>> {
    claims.require_staff()?;
    let transfer = state.services.transfers.cancel(id).await?;
    Ok(Json(transfer))
}
