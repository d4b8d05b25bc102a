//! Session Token
//!
//! The cookie value is the session id signed with the configured secret.

use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

pub fn issue(config: &AuthConfig, session_id: Uuid) -> String {
    platform::crypto::sign_token(&config.session_secret, session_id.as_bytes())
}

/// Verify the signature and recover the session id
pub fn parse(config: &AuthConfig, token: &str) -> AuthResult<Uuid> {
    let payload = platform::crypto::verify_token(&config.session_secret, token)
        .ok_or(AuthError::SessionInvalid)?;
    Uuid::from_slice(&payload).map_err(|_| AuthError::SessionInvalid)
}
