//! Application configuration from the environment (`.env` is loaded first).

use std::env;
use std::net::SocketAddr;

use anyhow::{Context, bail};
use auth::config::{AuthConfig, DEFAULT_DEMO_USER_PASSWORD};
use axum::http::HeaderValue;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string; the in-memory store is used when absent
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<HeaderValue>,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), cfg!(debug_assertions))
    }

    /// `development` allows a random session secret when none is configured.
    fn from_lookup<F>(lookup: F, development: bool) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address")?;

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .filter_map(|origin| origin.trim().parse().ok())
            .collect();

        let mut auth = if development {
            AuthConfig::development()
        } else {
            AuthConfig::default()
        };

        match var("SESSION_SECRET") {
            Some(secret) => {
                auth.session_secret = platform::crypto::key_from_base64(secret.trim())
                    .context("SESSION_SECRET must be 32 bytes encoded as base64")?;
            }
            None if development => {
                tracing::warn!("SESSION_SECRET not set, using a random secret");
            }
            None => bail!("SESSION_SECRET must be set in production"),
        }

        if let Some(secure) = var("COOKIE_SECURE") {
            auth.cookie_secure = parse_bool("COOKIE_SECURE", &secure)?;
        }
        if let Some(seed) = var("SEED_DEMO_USERS") {
            auth.seed_demo_users = parse_bool("SEED_DEMO_USERS", &seed)?;
        }
        auth.demo_user_password =
            var("DEMO_USER_PASSWORD").unwrap_or_else(|| DEFAULT_DEMO_USER_PASSWORD.to_string());
        auth.password_pepper = var("PASSWORD_PEPPER").map(String::into_bytes);

        Ok(Self {
            database_url: var("DATABASE_URL"),
            bind_addr,
            frontend_origins,
            auth,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{key} must be a boolean, got '{other}'"),
    }
}
