//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::password::PasswordPolicy;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Default password for the seeded demo accounts
pub const DEFAULT_DEMO_USER_PASSWORD: &str = "Demo#1234";

/// Failed-login lockout settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockoutOptions {
    /// Failures before the account is locked
    pub max_failed_access_attempts: i32,
    pub lockout_duration: Duration,
    /// Whether newly registered users can be locked out
    pub allowed_for_new_users: bool,
}

impl Default for LockoutOptions {
    fn default() -> Self {
        Self {
            max_failed_access_attempts: 5,
            lockout_duration: Duration::from_secs(5 * 60),
            allowed_for_new_users: true,
        }
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Session lifetime (12 hours)
    pub session_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    pub password_policy: PasswordPolicy,
    pub lockout: LockoutOptions,
    /// Seed the three demo accounts at startup
    pub seed_demo_users: bool,
    pub demo_user_password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "auth_session".to_string(),
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(12 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            password_policy: PasswordPolicy::default(),
            lockout: LockoutOptions::default(),
            seed_demo_users: false,
            demo_user_password: DEFAULT_DEMO_USER_PASSWORD.to_string(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret
    pub fn with_random_secret() -> Self {
        Self {
            session_secret: platform::crypto::random_key(),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie, demo accounts)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            seed_demo_users: true,
            ..Self::with_random_secret()
        }
    }

    /// Get session TTL in milliseconds
    pub fn session_ttl_ms(&self) -> i64 {
        self.session_ttl.as_millis() as i64
    }

    pub fn session_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.session_ttl_ms())
    }

    pub fn lockout_duration_chrono(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.lockout.lockout_duration.as_millis() as i64)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Cookie settings for the session cookie
    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_ttl.as_secs() as i64),
        }
    }
}
