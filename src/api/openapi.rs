//! OpenAPI documentation

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, libraries, notifications, requests, stats, transfers};
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Athenaeum API",
        version = "1.0.0",
        description = "Multi-branch Library Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        auth::register,
        // Libraries
        libraries::list_libraries,
        libraries::get_library,
        libraries::create_library,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::list_copies,
        books::create_copy,
        books::list_evaluations,
        books::create_evaluation,
        // Requests
        requests::list_user_requests,
        requests::create_request,
        requests::confirm_pickup,
        requests::return_request,
        requests::cancel_request,
        // Transfers
        transfers::list_library_transfers,
        transfers::create_transfer,
        transfers::accept_transfer,
        transfers::reject_transfer,
        transfers::cancel_transfer,
        // Notifications
        notifications::list_user_notifications,
        notifications::list_library_notifications,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            health::HealthResponse,
            auth::LoginRequest,
            auth::LoginResponse,
            requests::ReturnRequest,
            models::book::GenericBook,
            models::book::GenericBookDetails,
            models::book::CreateGenericBook,
            models::physical_book::PhysicalBook,
            models::physical_book::CreatePhysicalBook,
            models::library::Library,
            models::library::CreateLibrary,
            models::user::UserShort,
            models::user::CreateUser,
            models::request::Request,
            models::request::RequestDetails,
            models::request::CreateRequest,
            models::punishment::Punishment,
            models::transfer::Transfer,
            models::transfer::CreateTransfer,
            models::notification::Notification,
            models::evaluation::Evaluation,
            models::evaluation::CreateEvaluation,
            models::enums::PhysicalBookStatus,
            models::enums::RequestStatus,
            models::enums::PunishmentLevel,
            models::enums::TransferStatus,
            models::enums::Role,
            services::stats::Stats,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Service health"),
        (name = "auth", description = "Authentication"),
        (name = "libraries", description = "Branch management"),
        (name = "books", description = "Catalog and copies"),
        (name = "requests", description = "Holds and loans"),
        (name = "transfers", description = "Inter-branch transfers"),
        (name = "notifications", description = "Lifecycle notifications"),
        (name = "stats", description = "Dashboard statistics"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the Swagger UI router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
