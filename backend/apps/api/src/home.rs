//! Home controller (`/Home`)

use auth::CurrentUser;
use auth::domain::repository::AuthSessionRepository;
use auth::middleware::{AuthMiddlewareState, require_auth_session};
use axum::{Extension, Router, middleware::from_fn_with_state, routing::get};
use kernel::web::{ActionResult, ViewResult};

/// GET /
pub async fn root() -> ActionResult {
    ActionResult::redirect_to_action("Home", "Index")
}

/// GET /Home/Index
pub async fn index(Extension(current): Extension<CurrentUser>) -> ActionResult {
    ViewResult::new("Home", "Index").with_model(&current).into()
}

pub fn home_router<S>(sessions: AuthMiddlewareState<S>) -> Router
where
    S: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/Index", get(index))
        .route_layer(from_fn_with_state(sessions, require_auth_session::<S>))
}
