//! User Entity
//!
//! A user is the standard identity record ([`IdentityUser`]) composed with
//! the profile fields this application adds (first/last name) and the set of
//! roles the user holds.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;
use uuid::Uuid;

use crate::domain::value_object::{
    email::Email, role_name::RoleName, user_name::UserName, user_password::UserPassword,
};

fn new_stamp() -> String {
    Uuid::new_v4().simple().to_string().to_uppercase()
}

/// Identity base record
///
/// `concurrency_stamp` changes on every persisted update; a write carrying a
/// stale stamp is rejected by the repository.
#[derive(Debug, Clone)]
pub struct IdentityUser {
    pub id: UserId,
    pub user_name: UserName,
    pub email: Email,
    pub email_confirmed: bool,
    pub password_hash: UserPassword,
    /// Rotated whenever credentials change
    pub security_stamp: String,
    pub concurrency_stamp: String,
    pub lockout_enabled: bool,
    pub lockout_end: Option<DateTime<Utc>>,
    pub access_failed_count: i32,
}

impl IdentityUser {
    pub fn new(user_name: UserName, email: Email, password_hash: UserPassword) -> Self {
        Self {
            id: UserId::new(),
            user_name,
            email,
            email_confirmed: false,
            password_hash,
            security_stamp: new_stamp(),
            concurrency_stamp: new_stamp(),
            lockout_enabled: true,
            lockout_end: None,
            access_failed_count: 0,
        }
    }

    pub fn is_locked_out(&self, now: DateTime<Utc>) -> bool {
        self.lockout_enabled && self.lockout_end.is_some_and(|end| end > now)
    }

    /// Record a failed password check.
    ///
    /// Returns `true` when this failure locked the account. The counter
    /// resets once the lockout is applied.
    pub fn record_access_failure(
        &mut self,
        max_failed_attempts: i32,
        lockout_duration: Duration,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.lockout_enabled {
            return false;
        }

        self.access_failed_count += 1;
        if self.access_failed_count >= max_failed_attempts {
            self.lockout_end = Some(now + lockout_duration);
            self.access_failed_count = 0;
            return true;
        }
        false
    }

    pub fn reset_access_failures(&mut self) {
        self.access_failed_count = 0;
        self.lockout_end = None;
    }

    pub fn rotate_concurrency_stamp(&mut self) -> String {
        std::mem::replace(&mut self.concurrency_stamp, new_stamp())
    }
}

/// Application user
#[derive(Debug, Clone)]
pub struct User {
    pub identity: IdentityUser,
    pub first_name: String,
    pub last_name: String,
    pub roles: BTreeSet<RoleName>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        identity: IdentityUser,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        roles: impl IntoIterator<Item = RoleName>,
    ) -> Self {
        let now = Utc::now();
        Self {
            identity,
            first_name: first_name.into(),
            last_name: last_name.into(),
            roles: roles.into_iter().collect(),
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn id(&self) -> UserId {
        self.identity.id
    }

    #[inline]
    pub fn user_name(&self) -> &UserName {
        &self.identity.user_name
    }

    pub fn has_role(&self, role: RoleName) -> bool {
        self.roles.contains(&role)
    }

    /// Returns `false` when the role was already held
    pub fn grant_role(&mut self, role: RoleName) -> bool {
        let added = self.roles.insert(role);
        if added {
            self.touch();
        }
        added
    }

    /// Returns `false` when the role was not held
    pub fn revoke_role(&mut self, role: RoleName) -> bool {
        let removed = self.roles.remove(&role);
        if removed {
            self.touch();
        }
        removed
    }

    /// Replace the password hash and invalidate the security stamp
    pub fn set_password(&mut self, password_hash: UserPassword) {
        self.identity.password_hash = password_hash;
        self.identity.security_stamp = new_stamp();
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
