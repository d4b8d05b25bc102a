//! Current User
//!
//! The authenticated principal attached to a request by the session
//! middleware.

use std::collections::BTreeSet;

use kernel::id::UserId;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entity::auth_session::AuthSession;
use crate::domain::value_object::role_name::RoleName;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    #[serde(skip)]
    pub session_id: Uuid,
    pub user_id: UserId,
    pub user_name: String,
    pub roles: BTreeSet<RoleName>,
}

impl CurrentUser {
    pub fn has_role(&self, role: RoleName) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role(&self, roles: &[RoleName]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }

    pub fn is_admin_or_higher(&self) -> bool {
        self.has_any_role(&[RoleName::Admin, RoleName::SuperAdmin])
    }

    pub fn is_super_admin(&self) -> bool {
        self.has_role(RoleName::SuperAdmin)
    }
}

impl From<&AuthSession> for CurrentUser {
    fn from(session: &AuthSession) -> Self {
        Self {
            session_id: session.session_id,
            user_id: session.user_id,
            user_name: session.user_name.clone(),
            roles: session.roles.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current(roles: &[RoleName]) -> CurrentUser {
        CurrentUser {
            session_id: Uuid::new_v4(),
            user_id: UserId::new(),
            user_name: "user@example.com".to_string(),
            roles: roles.iter().copied().collect(),
        }
    }

    #[test]
    fn test_role_checks() {
        let user = current(&[RoleName::User]);
        assert!(!user.is_admin_or_higher());
        assert!(!user.is_super_admin());

        let admin = current(&[RoleName::Admin, RoleName::User]);
        assert!(admin.is_admin_or_higher());
        assert!(!admin.is_super_admin());

        let root = current(&RoleName::ALL);
        assert!(root.is_admin_or_higher());
        assert!(root.is_super_admin());
    }
}
