//! Authentication endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::Role,
        user::{CreateUser, UserShort},
    },
    AppState,
};

use super::AuthenticatedUser;

/// Login request
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub user: UserShort,
}

/// Authenticate and obtain a JWT
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, user) = state.services.auth.login(&body.email, &body.password).await?;
    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        user: UserShort::from(&user),
    }))
}

/// Current authenticated user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserShort),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<UserShort>> {
    let user = state.services.auth.get_user(claims.user_id).await?;
    Ok(Json(UserShort::from(&user)))
}

/// Register a user account. Anonymous registration is reader-only; granting
/// staff roles requires staff rights.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserShort),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    maybe_user: Option<AuthenticatedUser>,
    Json(body): Json<CreateUser>,
) -> AppResult<(axum::http::StatusCode, Json<UserShort>)> {
    if body.role.is_some_and(|r| r > Role::Reader) {
        match maybe_user {
            Some(AuthenticatedUser(claims)) => claims.require_staff()?,
            None => {
                return Err(AppError::Authorization(
                    "Staff rights required to grant elevated roles".to_string(),
                ))
            }
        }
    }

    let user = state.services.auth.create_user(&body).await?;
    Ok((axum::http::StatusCode::CREATED, Json(UserShort::from(&user))))
}
