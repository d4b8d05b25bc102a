//! Register Use Case
//!
//! Creates a new user account with one requested role.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::status::{Status, StatusKind};
use crate::domain::entity::user::{IdentityUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    role_name::RoleName,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub role: String,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Returns the outcome as a [`Status`]; only infrastructure failures are
    /// errors.
    pub async fn execute(&self, input: RegisterInput) -> AuthResult<Status> {
        if input.password != input.password_confirm {
            return Ok(Status::password_mismatch());
        }

        let role: RoleName = match input.role.parse() {
            Ok(role) => role,
            Err(e) => return Ok(Status::new(StatusKind::UnknownRole, e.to_string()).with_field("Role")),
        };

        let first_name = input.first_name.trim();
        if first_name.is_empty() {
            return Ok(Status::invalid_input(
                "FirstName",
                kernel::validation::required_message("FirstName"),
            ));
        }
        let last_name = input.last_name.trim();
        if last_name.is_empty() {
            return Ok(Status::invalid_input(
                "LastName",
                kernel::validation::required_message("LastName"),
            ));
        }

        let user_name = match UserName::new(&input.user_name) {
            Ok(name) => name,
            Err(e) => return Ok(Status::invalid_input("Username", e.to_string())),
        };
        let email = match Email::new(input.email) {
            Ok(email) => email,
            Err(e) => return Ok(Status::invalid_input("Email", e.message())),
        };
        let raw_password = match RawPassword::new(input.password, &self.config.password_policy) {
            Ok(password) => password,
            Err(e) => return Ok(Status::invalid_input("Password", e.message())),
        };

        if self
            .user_repo
            .exists_by_user_name_or_email(&user_name, &email)
            .await?
        {
            tracing::info!(user_name = %user_name, "Registration rejected: user exists");
            return Ok(Status::duplicate_user());
        }

        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        let mut identity = IdentityUser::new(user_name, email, password_hash);
        identity.lockout_enabled = self.config.lockout.allowed_for_new_users;
        let user = User::new(identity, first_name, last_name, [role]);

        match self.user_repo.create(&user).await {
            Ok(()) => {}
            // Lost a race against a concurrent registration
            Err(AuthError::DuplicateUser) => {
                tracing::info!(user_name = %user.user_name(), "Registration rejected: user exists");
                return Ok(Status::duplicate_user());
            }
            Err(e) => return Err(e),
        }

        tracing::info!(
            user_id = %user.id(),
            user_name = %user.user_name(),
            role = %role,
            "User registered"
        );

        Ok(Status::success("You have registered successfully"))
    }
}
