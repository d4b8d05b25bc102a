//! Login Use Case
//!
//! Authenticates a user and creates a session.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::application::status::Status;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::entity::user::User;
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::{user_name::UserName, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Saves of the lockout counter attempted before giving up on a contended user
const MAX_SAVE_ATTEMPTS: usize = 8;

/// Login input
pub struct LoginInput {
    pub user_name: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub status: Status,
    /// Signed session token for the cookie, present on success only
    pub session_token: Option<String>,
}

impl LoginOutput {
    fn failed(status: Status) -> Self {
        Self {
            status,
            session_token: None,
        }
    }
}

/// Login use case
pub struct LoginUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<U, S> LoginUseCase<U, S>
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

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let normalized = UserName::normalize(&input.user_name);
        let raw_password = RawPassword::for_verification(input.password);

        let Some(mut user) = self.user_repo.find_by_user_name(&normalized).await? else {
            tracing::warn!("Login failed: unknown user name");
            return Ok(LoginOutput::failed(Status::invalid_credentials()));
        };

        let now = Utc::now();
        if user.identity.is_locked_out(now) {
            tracing::warn!(user_id = %user.id(), "Login attempt on locked account");
            return Ok(LoginOutput::failed(Status::locked_out()));
        }

        if !user
            .identity
            .password_hash
            .verify(&raw_password, self.config.pepper())
        {
            let max_attempts = self.config.lockout.max_failed_access_attempts;
            let lockout_duration = self.config.lockout_duration_chrono();
            let (user, locked) = if user.identity.lockout_enabled {
                self.save_with_retry(user, |u| {
                    u.identity
                        .record_access_failure(max_attempts, lockout_duration, now)
                })
                .await?
            } else {
                (user, false)
            };

            if locked || user.identity.is_locked_out(now) {
                tracing::warn!(user_id = %user.id(), "Account locked after failed logins");
                return Ok(LoginOutput::failed(Status::locked_out()));
            }
            tracing::warn!(user_id = %user.id(), "Login failed: wrong password");
            return Ok(LoginOutput::failed(Status::invalid_credentials()));
        }

        if user.identity.access_failed_count != 0 || user.identity.lockout_end.is_some() {
            user = self
                .save_with_retry(user, |u| u.identity.reset_access_failures())
                .await?
                .0;
        }

        let session = AuthSession::new(&user, self.config.session_ttl_chrono());
        self.session_repo.create(&session).await?;

        tracing::info!(
            user_id = %user.id(),
            session_id = %session.session_id,
            "User logged in"
        );

        Ok(LoginOutput {
            status: Status::success("Logged in successfully"),
            session_token: Some(session_token::issue(&self.config, session.session_id)),
        })
    }

    /// Apply `change` and save the user.
    ///
    /// When a concurrent login saved first the stamp is stale: the user is
    /// re-read and `change` re-applied, at most `MAX_SAVE_ATTEMPTS` times.
    /// A stale write never fails the login; the last state seen is returned.
    async fn save_with_retry<T>(
        &self,
        mut user: User,
        mut change: impl FnMut(&mut User) -> T,
    ) -> AuthResult<(User, T)> {
        let mut attempt = 1;
        loop {
            let outcome = change(&mut user);
            user.touch();
            match self.user_repo.update(&mut user).await {
                Ok(()) => return Ok((user, outcome)),
                Err(AuthError::ConcurrencyFailure) if attempt < MAX_SAVE_ATTEMPTS => {
                    attempt += 1;
                    match self.user_repo.find_by_id(&user.id()).await? {
                        Some(fresh) => user = fresh,
                        None => return Ok((user, outcome)),
                    }
                }
                Err(AuthError::ConcurrencyFailure) => {
                    tracing::warn!(
                        user_id = %user.id(),
                        attempts = attempt,
                        "Gave up saving lockout state after concurrent logins"
                    );
                    return Ok((user, outcome));
                }
                Err(e) => return Err(e),
            }
        }
    }
}
