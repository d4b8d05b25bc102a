//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;
mod home;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::application::SeedIdentityUseCase;
use auth::domain::repository::{AuthSessionRepository, IdentityStore};
use auth::middleware::AuthMiddlewareState;
use auth::{AuthConfig, MemoryIdentityRepository, PgIdentityRepository, auth_router_generic};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use catalog::domain::ProductRepository;
use catalog::{MemoryProductRepository, PgProductRepository, catalog_router_generic};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,catalog=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let auth_config = Arc::new(config.auth.clone());

    let app = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            build_app(
                Arc::new(PgIdentityRepository::new(pool.clone())),
                Arc::new(PgProductRepository::new(pool)),
                auth_config,
                config.frontend_origins.clone(),
            )
            .await?
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores");
            build_app(
                Arc::new(MemoryIdentityRepository::new()),
                Arc::new(MemoryProductRepository::new()),
                auth_config,
                config.frontend_origins.clone(),
            )
            .await?
        }
    };

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Seed identity data, clean up stale sessions and assemble the router.
async fn build_app<I, P>(
    identities: Arc<I>,
    products: Arc<P>,
    auth_config: Arc<AuthConfig>,
    frontend_origins: Vec<HeaderValue>,
) -> anyhow::Result<Router>
where
    I: IdentityStore,
    P: ProductRepository + Clone + Send + Sync + 'static,
{
    // Roles must exist before anyone can register
    SeedIdentityUseCase::new(identities.clone(), identities.clone(), auth_config.clone())
        .execute()
        .await?;

    // Startup cleanup: remove expired sessions
    // Errors here should not prevent server startup
    match identities.cleanup_expired().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Auth session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Auth session cleanup failed, continuing anyway"
            );
        }
    }

    let cors = CorsLayer::new()
        .allow_origin(frontend_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    let sessions = AuthMiddlewareState::new(identities.clone(), auth_config.clone());

    Ok(Router::new()
        .route("/", get(home::root))
        .nest("/Home", home::home_router(sessions.clone()))
        .nest(
            "/UserAuthentication",
            auth_router_generic(identities, auth_config),
        )
        .nest("/Product", catalog_router_generic(products, sessions))
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}
