//! In-Memory Repository Implementation
//!
//! Same semantics as the PostgreSQL store (unique normalized names,
//! optimistic concurrency, atomic user + role writes). Used by tests and
//! when no database is configured.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use kernel::id::UserId;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entity::{auth_session::AuthSession, role::Role, user::User};
use crate::domain::repository::{AuthSessionRepository, RoleRepository, UserRepository};
use crate::domain::value_object::{email::Email, role_name::RoleName, user_name::UserName};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    roles: BTreeMap<RoleName, Role>,
    sessions: HashMap<Uuid, AuthSession>,
}

impl State {
    fn name_or_email_taken(&self, user_name: &str, email: &str, except: Option<UserId>) -> bool {
        self.users.values().any(|u| {
            Some(u.id()) != except
                && (u.identity.user_name.normalized() == user_name
                    || u.identity.email.normalized() == email)
        })
    }
}

/// In-memory identity store
#[derive(Clone, Default)]
pub struct MemoryIdentityRepository {
    state: Arc<RwLock<State>>,
}

impl MemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for MemoryIdentityRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut state = self.state.write().await;

        if state.users.contains_key(&user.id())
            || state.name_or_email_taken(
                user.identity.user_name.normalized(),
                user.identity.email.normalized(),
                None,
            )
        {
            return Err(AuthError::DuplicateUser);
        }

        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.state.read().await.users.get(user_id).cloned())
    }

    async fn find_by_user_name(&self, normalized_user_name: &str) -> AuthResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.identity.user_name.normalized() == normalized_user_name)
            .cloned())
    }

    async fn exists_by_user_name_or_email(
        &self,
        user_name: &UserName,
        email: &Email,
    ) -> AuthResult<bool> {
        let state = self.state.read().await;
        Ok(state.name_or_email_taken(user_name.normalized(), email.normalized(), None))
    }

    async fn update(&self, user: &mut User) -> AuthResult<()> {
        let mut state = self.state.write().await;

        let stored = state.users.get(&user.id()).ok_or(AuthError::UserNotFound)?;
        if stored.identity.concurrency_stamp != user.identity.concurrency_stamp {
            return Err(AuthError::ConcurrencyFailure);
        }
        if state.name_or_email_taken(
            user.identity.user_name.normalized(),
            user.identity.email.normalized(),
            Some(user.id()),
        ) {
            return Err(AuthError::DuplicateUser);
        }

        user.identity.rotate_concurrency_stamp();
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|a, b| a.user_name().normalized().cmp(b.user_name().normalized()));
        Ok(users)
    }
}

// ============================================================================
// Role Repository Implementation
// ============================================================================

impl RoleRepository for MemoryIdentityRepository {
    async fn find_by_name(&self, name: RoleName) -> AuthResult<Option<Role>> {
        Ok(self.state.read().await.roles.get(&name).cloned())
    }

    async fn create_if_absent(&self, role: &Role) -> AuthResult<bool> {
        let mut state = self.state.write().await;
        if state.roles.contains_key(&role.name) {
            return Ok(false);
        }
        state.roles.insert(role.name, role.clone());
        Ok(true)
    }

    async fn list(&self) -> AuthResult<Vec<Role>> {
        Ok(self.state.read().await.roles.values().cloned().collect())
    }
}

// ============================================================================
// Auth Session Repository Implementation
// ============================================================================

impl AuthSessionRepository for MemoryIdentityRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        self.state
            .write()
            .await
            .sessions
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>> {
        Ok(self.state.read().await.sessions.get(&session_id).cloned())
    }

    async fn delete(&self, session_id: Uuid) -> AuthResult<()> {
        self.state.write().await.sessions.remove(&session_id);
        Ok(())
    }

    async fn delete_all_for_user(&self, user_id: &UserId, except: Option<Uuid>) -> AuthResult<u64> {
        let mut state = self.state.write().await;
        let before = state.sessions.len();
        state
            .sessions
            .retain(|id, s| s.user_id != *user_id || Some(*id) == except);
        Ok((before - state.sessions.len()) as u64)
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();
        let mut state = self.state.write().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, s| s.expires_at_ms >= now_ms);
        Ok((before - state.sessions.len()) as u64)
    }
}
