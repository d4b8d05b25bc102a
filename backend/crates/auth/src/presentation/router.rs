//! Auth Router
//!
//! Mounted under `/UserAuthentication`.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::IdentityStore;
use crate::infra::postgres::PgIdentityRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_auth_session};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgIdentityRepository, config: AuthConfig) -> Router {
    auth_router_generic(Arc::new(repo), Arc::new(config))
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: Arc<R>, config: Arc<AuthConfig>) -> Router
where
    R: IdentityStore,
{
    let session = AuthMiddlewareState::new(repo.clone(), config.clone());
    let state = AuthAppState { repo, config };

    let protected = Router::new()
        .route(
            "/ChangePassword",
            get(handlers::change_password_form).post(handlers::change_password::<R>),
        )
        .route("/GrantRole", post(handlers::grant_role::<R>))
        .route("/RevokeRole", post(handlers::revoke_role::<R>))
        .route_layer(from_fn_with_state(session, require_auth_session::<R>));

    Router::new()
        .route(
            "/Registration",
            get(handlers::registration_form).post(handlers::registration::<R>),
        )
        .route(
            "/Login",
            get(handlers::login_form).post(handlers::login::<R>),
        )
        .route(
            "/Logout",
            get(handlers::logout::<R>).post(handlers::logout::<R>),
        )
        .merge(protected)
        .with_state(state)
}
