//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in `infra`
//! (PostgreSQL and in-memory).

use kernel::id::UserId;
use uuid::Uuid;

use crate::domain::entity::{auth_session::AuthSession, role::Role, user::User};
use crate::domain::value_object::{email::Email, role_name::RoleName, user_name::UserName};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert the user together with its role links.
    ///
    /// Fails with `AuthError::DuplicateUser` when the normalized user name or
    /// email is already taken, including when a concurrent insert wins.
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Lookup by normalized user name
    async fn find_by_user_name(&self, normalized_user_name: &str) -> AuthResult<Option<User>>;

    async fn exists_by_user_name_or_email(
        &self,
        user_name: &UserName,
        email: &Email,
    ) -> AuthResult<bool>;

    /// Persist changes and role links.
    ///
    /// The stored concurrency stamp must equal `user`'s; on success `user`
    /// carries the fresh stamp. A stale stamp yields
    /// `AuthError::ConcurrencyFailure`.
    async fn update(&self, user: &mut User) -> AuthResult<()>;

    /// All users ordered by user name
    async fn list(&self) -> AuthResult<Vec<User>>;
}

/// Role repository trait
#[trait_variant::make(RoleRepository: Send)]
pub trait LocalRoleRepository {
    async fn find_by_name(&self, name: RoleName) -> AuthResult<Option<Role>>;

    /// Insert unless a role with the same normalized name exists.
    /// Returns `true` when the role was inserted.
    async fn create_if_absent(&self, role: &Role) -> AuthResult<bool>;

    async fn list(&self) -> AuthResult<Vec<Role>>;
}

/// Auth session repository trait
#[trait_variant::make(AuthSessionRepository: Send)]
pub trait LocalAuthSessionRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()>;

    async fn find_by_id(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>>;

    async fn delete(&self, session_id: Uuid) -> AuthResult<()>;

    /// Delete all sessions for a user (except `except`)
    async fn delete_all_for_user(&self, user_id: &UserId, except: Option<Uuid>) -> AuthResult<u64>;

    async fn cleanup_expired(&self) -> AuthResult<u64>;
}

/// Everything the identity use cases and handlers need from one store
pub trait IdentityStore:
    UserRepository + RoleRepository + AuthSessionRepository + Clone + Send + Sync + 'static
{
}

impl<T> IdentityStore for T where
    T: UserRepository + RoleRepository + AuthSessionRepository + Clone + Send + Sync + 'static
{
}
