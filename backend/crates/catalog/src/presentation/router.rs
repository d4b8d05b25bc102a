//! Catalog Router
//!
//! Mounted under `/Product`. Every route requires a session; mutations
//! additionally require the Admin or SuperAdmin role.

use std::sync::Arc;

use auth::domain::repository::AuthSessionRepository;
use auth::middleware::{AuthMiddlewareState, require_auth_session};
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::domain::ProductRepository;
use crate::infra::postgres::PgProductRepository;
use crate::presentation::handlers::{self, CatalogAppState};

/// Create the Catalog router with PostgreSQL repository
pub fn catalog_router<S>(repo: PgProductRepository, sessions: AuthMiddlewareState<S>) -> Router
where
    S: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    catalog_router_generic(Arc::new(repo), sessions)
}

/// Create a generic Catalog router for any repository implementation
pub fn catalog_router_generic<R, S>(repo: Arc<R>, sessions: AuthMiddlewareState<S>) -> Router
where
    R: ProductRepository + Clone + Send + Sync + 'static,
    S: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let state = CatalogAppState { repo };

    Router::new()
        .route("/Index", get(handlers::index::<R>))
        .route("/Details/{id}", get(handlers::details::<R>))
        .route(
            "/Create",
            get(handlers::create_form).post(handlers::create::<R>),
        )
        .route(
            "/Edit/{id}",
            get(handlers::edit_form::<R>).post(handlers::edit::<R>),
        )
        .route("/Delete/{id}", post(handlers::delete::<R>))
        .route_layer(from_fn_with_state(sessions, require_auth_session::<S>))
        .with_state(state)
}
