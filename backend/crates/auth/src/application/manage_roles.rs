//! Role Assignment Use Case
//!
//! Grants or revokes one of the fixed roles. Sessions of the target user are
//! revoked so the new role set applies from the next login.

use std::sync::Arc;

use crate::application::status::{Status, StatusKind};
use crate::domain::repository::{AuthSessionRepository, RoleRepository, UserRepository};
use crate::domain::value_object::{role_name::RoleName, user_name::UserName};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChange {
    Grant,
    Revoke,
}

pub struct ManageRolesUseCase<U, R, S>
where
    U: UserRepository,
    R: RoleRepository,
    S: AuthSessionRepository,
{
    user_repo: Arc<U>,
    role_repo: Arc<R>,
    session_repo: Arc<S>,
}

impl<U, R, S> ManageRolesUseCase<U, R, S>
where
    U: UserRepository,
    R: RoleRepository,
    S: AuthSessionRepository,
{
    pub fn new(user_repo: Arc<U>, role_repo: Arc<R>, session_repo: Arc<S>) -> Self {
        Self {
            user_repo,
            role_repo,
            session_repo,
        }
    }

    pub async fn grant(&self, user_name: &str, role: &str) -> AuthResult<Status> {
        self.execute(user_name, role, RoleChange::Grant).await
    }

    pub async fn revoke(&self, user_name: &str, role: &str) -> AuthResult<Status> {
        self.execute(user_name, role, RoleChange::Revoke).await
    }

    async fn execute(&self, user_name: &str, role: &str, change: RoleChange) -> AuthResult<Status> {
        let role: RoleName = match role.parse() {
            Ok(role) => role,
            Err(e) => return Ok(Status::new(StatusKind::UnknownRole, e.to_string()).with_field("Role")),
        };

        // Roles are seeded at startup; a missing row means the store is not ready
        if self.role_repo.find_by_name(role).await?.is_none() {
            return Err(AuthError::Internal(format!("Role {role} has not been seeded")));
        }

        let mut user = self
            .user_repo
            .find_by_user_name(&UserName::normalize(user_name))
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let changed = match change {
            RoleChange::Grant => user.grant_role(role),
            RoleChange::Revoke => user.revoke_role(role),
        };
        if !changed {
            return Ok(Status::success("No change"));
        }

        self.user_repo.update(&mut user).await?;
        let revoked = self.session_repo.delete_all_for_user(&user.id(), None).await?;

        tracing::info!(
            user_id = %user.id(),
            role = %role,
            change = ?change,
            sessions_revoked = revoked,
            "User roles changed"
        );

        Ok(Status::success(match change {
            RoleChange::Grant => format!("Role {role} granted"),
            RoleChange::Revoke => format!("Role {role} revoked"),
        }))
    }
}
