//! Athenaeum Server - Multi-branch Library Management System

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use athenaeum_server::{
    api,
    config::AppConfig,
    jobs::JobsRunner,
    repository::Repository,
    services::{email::EmailService, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("athenaeum_server={},tower_http=debug", config.logging.level).into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Athenaeum Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(
        repository.clone(),
        config.auth.clone(),
        config.email.clone(),
        config.jobs.clone(),
    );

    // Spawn the lifecycle jobs
    JobsRunner::new(
        repository.clone(),
        config.jobs.clone(),
        EmailService::new(config.email.clone()),
    )
    .spawn();

    tracing::info!("Lifecycle jobs scheduled");

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        repository,
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(server_host.parse().expect("Invalid host address"), server_port);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        .route("/auth/register", post(api::auth::register))
        // Libraries
        .route("/libraries", get(api::libraries::list_libraries))
        .route("/libraries", post(api::libraries::create_library))
        .route("/libraries/:id", get(api::libraries::get_library))
        .route(
            "/libraries/:id/transfers",
            get(api::transfers::list_library_transfers),
        )
        .route(
            "/libraries/:id/notifications",
            get(api::notifications::list_library_notifications),
        )
        // Books (catalog)
        .route("/books", get(api::books::list_books))
        .route("/books", post(api::books::create_book))
        .route("/books/:id", get(api::books::get_book))
        .route("/books/:id/copies", get(api::books::list_copies))
        .route("/books/:id/copies", post(api::books::create_copy))
        .route("/books/:id/evaluations", get(api::books::list_evaluations))
        .route("/books/:id/evaluations", post(api::books::create_evaluation))
        // Requests (holds)
        .route("/requests", post(api::requests::create_request))
        .route("/requests/:id/pickup", post(api::requests::confirm_pickup))
        .route("/requests/:id/return", post(api::requests::return_request))
        .route("/requests/:id/cancel", post(api::requests::cancel_request))
        .route("/users/:id/requests", get(api::requests::list_user_requests))
        .route(
            "/users/:id/notifications",
            get(api::notifications::list_user_notifications),
        )
        // Transfers
        .route("/transfers", post(api::transfers::create_transfer))
        .route("/transfers/:id/accept", post(api::transfers::accept_transfer))
        .route("/transfers/:id/reject", post(api::transfers::reject_transfer))
        .route("/transfers/:id/cancel", post(api::transfers::cancel_transfer))
        // Statistics
        .route("/stats", get(api::stats::get_stats))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
