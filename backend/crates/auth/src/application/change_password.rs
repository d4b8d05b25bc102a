//! Change Password Use Case

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::status::Status;
use crate::domain::entity::current_user::CurrentUser;
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
    pub password_confirm: String,
}

pub struct ChangePasswordUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> ChangePasswordUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    /// On success every other session of the user is revoked.
    pub async fn execute(
        &self,
        current: &CurrentUser,
        input: ChangePasswordInput,
    ) -> AuthResult<Status> {
        if input.new_password != input.password_confirm {
            return Ok(Status::password_mismatch());
        }

        let mut user = self
            .user_repo
            .find_by_id(&current.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let current_password = RawPassword::for_verification(input.current_password);
        if !user
            .identity
            .password_hash
            .verify(&current_password, self.config.pepper())
        {
            tracing::warn!(user_id = %user.id(), "Password change rejected: wrong current password");
            return Ok(Status::invalid_credentials().with_field("CurrentPassword"));
        }

        let new_password = match RawPassword::new(input.new_password, &self.config.password_policy) {
            Ok(password) => password,
            Err(e) => return Ok(Status::invalid_input("NewPassword", e.message())),
        };

        user.set_password(UserPassword::from_raw(&new_password, self.config.pepper())?);
        self.user_repo.update(&mut user).await?;

        let revoked = self
            .session_repo
            .delete_all_for_user(&user.id(), Some(current.session_id))
            .await?;

        tracing::info!(
            user_id = %user.id(),
            sessions_revoked = revoked,
            "Password changed"
        );

        Ok(Status::success("Password changed successfully"))
    }
}
