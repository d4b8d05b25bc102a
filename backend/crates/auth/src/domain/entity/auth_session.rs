//! Auth Session Entity
//!
//! Server-side session referenced by the signed session cookie. Roles are
//! captured at login; role changes revoke the user's sessions.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::value_object::role_name::RoleName;

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub session_id: Uuid,
    pub user_id: UserId,
    pub user_name: String,
    pub roles: BTreeSet<RoleName>,
    /// Unix timestamp (ms)
    pub expires_at_ms: i64,
    pub created_at: DateTime<Utc>,
}

impl AuthSession {
    /// Open a session for `user`; TTL comes from configuration.
    pub fn new(user: &User, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4(),
            user_id: user.id(),
            user_name: user.user_name().as_str().to_string(),
            roles: user.roles.clone(),
            expires_at_ms: (now + ttl).timestamp_millis(),
            created_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }

    pub fn remaining_ms(&self) -> i64 {
        (self.expires_at_ms - Utc::now().timestamp_millis()).max(0)
    }
}
