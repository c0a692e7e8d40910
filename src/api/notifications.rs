//! Notification endpoints (read-only; lifecycle transitions create them)

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::AppResult, models::Notification, AppState};

use super::AuthenticatedUser;

/// List a user's unexpired notifications, targeted and broadcast
#[utoipa::path(
    get,
    path = "/users/{id}/notifications",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Notifications", body = Vec<Notification>),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_user_notifications(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<Notification>>> {
    claims.require_self_or_staff(user_id)?;
    let notifications = state.services.notifications.list_for_user(user_id).await?;
    Ok(Json(notifications))
}

/// List a branch's unexpired notifications
#[utoipa::path(
    get,
    path = "/libraries/{id}/notifications",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Library ID")),
    responses(
        (status = 200, description = "Notifications", body = Vec<Notification>),
        (status = 404, description = "Library not found")
    )
)]
pub async fn list_library_notifications(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(library_id): Path<i32>,
) -> AppResult<Json<Vec<Notification>>> {
    claims.require_staff()?;
    let notifications = state
        .services
        .notifications
        .list_for_library(library_id)
        .await?;
    Ok(Json(notifications))
}
