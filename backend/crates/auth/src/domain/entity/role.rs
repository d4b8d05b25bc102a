//! Role Entity

use kernel::id::RoleId;

use crate::domain::value_object::role_name::RoleName;

/// Persisted role record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: RoleName,
    pub concurrency_stamp: String,
}

impl Role {
    /// Fixed role record with its deterministic id
    pub fn fixed(name: RoleName) -> Self {
        Self {
            id: name.id(),
            name,
            concurrency_stamp: name.id().to_string(),
        }
    }

    pub fn all() -> Vec<Role> {
        RoleName::ALL.into_iter().map(Role::fixed).collect()
    }

    pub fn normalized_name(&self) -> &'static str {
        self.name.normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_roles() {
        let roles = Role::all();
        assert_eq!(roles.len(), 3);
        assert_eq!(roles[0].name, RoleName::SuperAdmin);
        assert_eq!(roles[0].normalized_name(), "SUPERADMIN");
        assert_eq!(Role::fixed(RoleName::User).id, RoleName::User.id());
    }
}
