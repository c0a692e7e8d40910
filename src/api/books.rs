//! Catalog endpoints: books, copies and evaluations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        book::{BookQuery, CreateGenericBook, GenericBook, GenericBookDetails},
        evaluation::{CreateEvaluation, Evaluation},
        physical_book::CreatePhysicalBook,
        PhysicalBook,
    },
    AppState,
};

use super::AuthenticatedUser;

/// List catalog entries with availability
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Catalog entries", body = Vec<GenericBookDetails>)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<GenericBookDetails>>> {
    let books = state.services.catalog.list_books(&query).await?;
    Ok(Json(books))
}

/// Get one catalog entry
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Catalog entry", body = GenericBook),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<GenericBook>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Create a catalog entry
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateGenericBook,
    responses(
        (status = 201, description = "Catalog entry created", body = GenericBook),
        (status = 409, description = "ISBN already exists")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(body): Json<CreateGenericBook>,
) -> AppResult<(StatusCode, Json<GenericBook>)> {
    claims.require_staff()?;
    let book = state.services.catalog.create_book(&body).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// List the physical copies of a catalog entry
#[utoipa::path(
    get,
    path = "/books/{id}/copies",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Physical copies", body = Vec<PhysicalBook>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_copies(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<PhysicalBook>>> {
    claims.require_staff()?;
    let copies = state.services.catalog.list_copies(id).await?;
    Ok(Json(copies))
}

/// Shelve a new physical copy at a branch
#[utoipa::path(
    post,
    path = "/books/{id}/copies",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = CreatePhysicalBook,
    responses(
        (status = 201, description = "Copy created", body = PhysicalBook),
        (status = 404, description = "Book or library not found")
    )
)]
pub async fn create_copy(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(body): Json<CreatePhysicalBook>,
) -> AppResult<(StatusCode, Json<PhysicalBook>)> {
    claims.require_staff()?;
    let copy = state.services.catalog.create_copy(id, body.library_id).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// List evaluations of a catalog entry
#[utoipa::path(
    get,
    path = "/books/{id}/evaluations",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Evaluations", body = Vec<Evaluation>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_evaluations(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Evaluation>>> {
    let evaluations = state.services.catalog.list_evaluations(id).await?;
    Ok(Json(evaluations))
}

/// Rate a catalog entry (one evaluation per user, replaced on repeat)
#[utoipa::path(
    post,
    path = "/books/{id}/evaluations",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = CreateEvaluation,
    responses(
        (status = 201, description = "Evaluation recorded", body = Evaluation),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_evaluation(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(body): Json<CreateEvaluation>,
) -> AppResult<(StatusCode, Json<Evaluation>)> {
    let evaluation = state
        .services
        .catalog
        .evaluate(claims.user_id, id, &body)
        .await?;
    Ok((StatusCode::CREATED, Json(evaluation)))
}
