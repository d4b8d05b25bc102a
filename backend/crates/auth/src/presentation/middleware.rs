//! Auth Middleware
//!
//! Middleware for requiring authentication on protected routes.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::web::ActionResult;

use crate::application::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::repository::AuthSessionRepository;
use crate::error::AuthError;
use crate::presentation::handlers::CONTROLLER;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthMiddlewareState<R>
where
    R: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }
}

/// Middleware that requires a valid auth session.
///
/// Unauthenticated requests are redirected to the login action; valid
/// sessions attach a [`CurrentUser`](crate::domain::CurrentUser) extension.
pub async fn require_auth_session<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let token =
        platform::cookie::extract_cookie(req.headers(), &state.config.session_cookie_name);

    let Some(token) = token else {
        return ActionResult::redirect_to_action(CONTROLLER, "Login").into_response();
    };

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());

    match use_case.execute(&token).await {
        Ok(current_user) => {
            req.extensions_mut().insert(current_user);
            next.run(req).await
        }
        Err(AuthError::SessionInvalid) => {
            ActionResult::redirect_to_action(CONTROLLER, "Login").into_response()
        }
        Err(e) => e.into_response(),
    }
}
