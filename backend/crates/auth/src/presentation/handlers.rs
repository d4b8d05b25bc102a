//! HTTP Handlers (`/UserAuthentication`)

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Form};
use kernel::validation::ModelState;
use kernel::web::{ActionResult, ViewResult};

use crate::application::config::AuthConfig;
use crate::application::{
    ChangePasswordUseCase, LoginUseCase, LogoutUseCase, ManageRolesUseCase, RegisterUseCase,
    Status, StatusKind,
};
use crate::domain::entity::current_user::CurrentUser;
use crate::domain::repository::IdentityStore;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    ChangePasswordForm, LoginForm, RegistrationForm, RoleAssignmentForm,
};

/// Controller name used in views and action redirects
pub const CONTROLLER: &str = "UserAuthentication";

/// Landing page after a successful login
pub const HOME_PATH: &str = "/Home/Index";

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: IdentityStore,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

fn view(action: &str) -> ViewResult {
    ViewResult::new(CONTROLLER, action)
}

fn redirect_to_login() -> ActionResult {
    ActionResult::redirect_to_action(CONTROLLER, "Login")
}

/// Failed status as model errors: form-level, plus the field it names.
fn status_errors(status: &Status) -> ModelState {
    let mut state = ModelState::new();
    if let Some(field) = status.field {
        state.add_error(field, status.message.clone());
    }
    state.add_form_error(status.message.clone());
    state
}

fn with_cookie(mut response: Response, cookie: Option<header::HeaderValue>) -> Response {
    match cookie {
        Some(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        None => tracing::error!("Session cookie could not be encoded"),
    }
    response
}

// ============================================================================
// Registration
// ============================================================================

/// GET /UserAuthentication/Registration
pub async fn registration_form() -> ActionResult {
    view("Registration")
        .with_model(&RegistrationForm::default())
        .into()
}

/// POST /UserAuthentication/Registration
pub async fn registration<R>(
    State(state): State<AuthAppState<R>>,
    Form(form): Form<RegistrationForm>,
) -> AuthResult<ActionResult>
where
    R: IdentityStore,
{
    let model_state = form.validate();
    if !model_state.is_valid() {
        return Ok(view("Registration")
            .with_model(&form)
            .with_model_state(model_state)
            .into());
    }

    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());
    let model = form.clone();
    let status = use_case.execute(form.into_input()).await?;

    if status.is_success() {
        return Ok(redirect_to_login());
    }

    Ok(view("Registration")
        .with_model(&model)
        .with_model_state(status_errors(&status))
        .into())
}

// ============================================================================
// Login
// ============================================================================

/// GET /UserAuthentication/Login
pub async fn login_form() -> ActionResult {
    view("Login").with_model(&LoginForm::default()).into()
}

/// POST /UserAuthentication/Login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Form(form): Form<LoginForm>,
) -> AuthResult<Response>
where
    R: IdentityStore,
{
    let model_state = form.validate();
    if !model_state.is_valid() {
        return Ok(view("Login")
            .with_model(&form)
            .with_model_state(model_state)
            .into_response());
    }

    let use_case = LoginUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());
    let output = use_case.execute(form.into_input()).await?;

    match (output.status.code(), output.session_token) {
        (1, Some(token)) => {
            let cookie = platform::cookie::set_cookie_header(&state.config.cookie_config(), &token);
            Ok(with_cookie(
                ActionResult::redirect(HOME_PATH).into_response(),
                cookie,
            ))
        }
        _ => Ok(redirect_to_login().into_response()),
    }
}

// ============================================================================
// Logout
// ============================================================================

/// GET|POST /UserAuthentication/Logout
pub async fn logout<R>(State(state): State<AuthAppState<R>>, headers: HeaderMap) -> Response
where
    R: IdentityStore,
{
    let token = platform::cookie::extract_cookie(&headers, &state.config.session_cookie_name);

    let use_case = LogoutUseCase::new(state.repo.clone(), state.config.clone());
    // The cookie is cleared regardless of the store outcome
    if let Err(e) = use_case.execute(token.as_deref()).await {
        e.log();
    }

    let cookie = platform::cookie::delete_cookie_header(&state.config.cookie_config());
    with_cookie(redirect_to_login().into_response(), cookie)
}

// ============================================================================
// Change Password (requires authentication)
// ============================================================================

/// GET /UserAuthentication/ChangePassword
pub async fn change_password_form() -> ActionResult {
    view("ChangePassword")
        .with_model(&ChangePasswordForm::default())
        .into()
}

/// POST /UserAuthentication/ChangePassword
pub async fn change_password<R>(
    State(state): State<AuthAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Form(form): Form<ChangePasswordForm>,
) -> AuthResult<ActionResult>
where
    R: IdentityStore,
{
    let model_state = form.validate();
    if !model_state.is_valid() {
        return Ok(view("ChangePassword").with_model_state(model_state).into());
    }

    let use_case =
        ChangePasswordUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());
    let status = use_case.execute(&current, form.into_input()).await?;

    if status.is_success() {
        return Ok(ActionResult::redirect(HOME_PATH));
    }

    Ok(view("ChangePassword")
        .with_model_state(status_errors(&status))
        .into())
}

// ============================================================================
// Role Management (SuperAdmin only)
// ============================================================================

/// POST /UserAuthentication/GrantRole
pub async fn grant_role<R>(
    State(state): State<AuthAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Form(form): Form<RoleAssignmentForm>,
) -> AuthResult<StatusCode>
where
    R: IdentityStore,
{
    let use_case = role_use_case(&state, &current, &form)?;
    let status = use_case.grant(&form.username, &form.role).await?;
    role_status(status)
}

/// POST /UserAuthentication/RevokeRole
pub async fn revoke_role<R>(
    State(state): State<AuthAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Form(form): Form<RoleAssignmentForm>,
) -> AuthResult<StatusCode>
where
    R: IdentityStore,
{
    let use_case = role_use_case(&state, &current, &form)?;
    let status = use_case.revoke(&form.username, &form.role).await?;
    role_status(status)
}

fn role_use_case<R>(
    state: &AuthAppState<R>,
    current: &CurrentUser,
    form: &RoleAssignmentForm,
) -> AuthResult<ManageRolesUseCase<R, R, R>>
where
    R: IdentityStore,
{
    if !current.is_super_admin() {
        tracing::warn!(user_id = %current.user_id, "Role change attempted without SuperAdmin");
        return Err(AuthError::Forbidden);
    }

    let model_state = form.validate();
    if let Some(field) = model_state.invalid_fields().next() {
        return Err(AuthError::Validation(
            model_state.errors_for(field).join(" "),
        ));
    }

    Ok(ManageRolesUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
    ))
}

fn role_status(status: Status) -> AuthResult<StatusCode> {
    match status.kind {
        StatusKind::Success => Ok(StatusCode::NO_CONTENT),
        _ => Err(AuthError::Validation(status.message)),
    }
}
