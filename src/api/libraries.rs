//! Library (branch) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::library::{CreateLibrary, Library},
    AppState,
};

use super::AuthenticatedUser;

/// List all branches
#[utoipa::path(
    get,
    path = "/libraries",
    tag = "libraries",
    responses(
        (status = 200, description = "Branches", body = Vec<Library>)
    )
)]
pub async fn list_libraries(State(state): State<AppState>) -> AppResult<Json<Vec<Library>>> {
    let libraries = state.repository.libraries.list().await?;
    Ok(Json(libraries))
}

/// Get one branch
#[utoipa::path(
    get,
    path = "/libraries/{id}",
    tag = "libraries",
    params(("id" = i32, Path, description = "Library ID")),
    responses(
        (status = 200, description = "Branch", body = Library),
        (status = 404, description = "Library not found")
    )
)]
pub async fn get_library(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Library>> {
    let library = state.repository.libraries.get_by_id(id).await?;
    Ok(Json(library))
}

/// Create a branch
#[utoipa::path(
    post,
    path = "/libraries",
    tag = "libraries",
    security(("bearer_auth" = [])),
    request_body = CreateLibrary,
    responses(
        (status = 201, description = "Branch created", body = Library),
        (status = 409, description = "Alias already exists")
    )
)]
pub async fn create_library(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(body): Json<CreateLibrary>,
) -> AppResult<(StatusCode, Json<Library>)> {
    claims.require_admin()?;
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let library = state.repository.libraries.create(&body).await?;
    Ok((StatusCode::CREATED, Json(library)))
}
