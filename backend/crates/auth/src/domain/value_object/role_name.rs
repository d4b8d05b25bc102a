//! Role Name Value Object
//!
//! The fixed role set. Each role has a deterministic id so seeding stays
//! idempotent across databases and restarts.

use std::str::FromStr;

use derive_more::Display;
use kernel::id::RoleId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

const SUPER_ADMIN_ID: RoleId =
    RoleId::from_uuid(Uuid::from_u128(0x3c098b69_3c26_408f_b7c7_b0eb6aa15d31));
const ADMIN_ID: RoleId =
    RoleId::from_uuid(Uuid::from_u128(0x8bf03ad8_5f49_4e6d_9513_02fec50ac1fa));
const USER_ID: RoleId = RoleId::from_uuid(Uuid::from_u128(0xf66f10b8_fb12_45cd_bcea_6e2eb49b65f1));

/// Requested role is not one of the fixed roles
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Role '{0}' does not exist")]
pub struct UnknownRoleError(pub String);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, Serialize, Deserialize,
)]
#[repr(i16)]
pub enum RoleName {
    #[default]
    User = 0,
    Admin = 1,
    SuperAdmin = 2,
}

impl RoleName {
    pub const ALL: [RoleName; 3] = [RoleName::SuperAdmin, RoleName::Admin, RoleName::User];

    #[inline]
    pub const fn id(&self) -> RoleId {
        match self {
            RoleName::SuperAdmin => SUPER_ADMIN_ID,
            RoleName::Admin => ADMIN_ID,
            RoleName::User => USER_ID,
        }
    }

    /// Compact code stored with sessions
    #[inline]
    pub const fn code(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RoleName::SuperAdmin => "SuperAdmin",
            RoleName::Admin => "Admin",
            RoleName::User => "User",
        }
    }

    #[inline]
    pub const fn normalized(&self) -> &'static str {
        match self {
            RoleName::SuperAdmin => "SUPERADMIN",
            RoleName::Admin => "ADMIN",
            RoleName::User => "USER",
        }
    }

    pub fn from_id(id: &RoleId) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.id() == *id)
    }

    pub fn from_code(code: i16) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.code() == code)
    }

    /// Roles granted to the demo account of this role
    ///
    /// SuperAdmin carries every role, Admin carries Admin and User.
    pub fn implied(&self) -> &'static [RoleName] {
        match self {
            RoleName::SuperAdmin => &[RoleName::SuperAdmin, RoleName::Admin, RoleName::User],
            RoleName::Admin => &[RoleName::Admin, RoleName::User],
            RoleName::User => &[RoleName::User],
        }
    }
}

impl FromStr for RoleName {
    type Err = UnknownRoleError;

    /// Case-insensitive, accepts `user`, `admin`, `superadmin` (and `super_admin`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('_', "").to_uppercase();
        Self::ALL
            .into_iter()
            .find(|role| role.normalized() == normalized)
            .ok_or_else(|| UnknownRoleError(s.trim().to_string()))
    }
}
