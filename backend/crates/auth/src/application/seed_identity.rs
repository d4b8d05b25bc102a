//! Seed Identity Use Case
//!
//! Inserts the fixed roles and, when enabled, the demo accounts. Safe to run
//! on every startup: existing rows are left untouched.

use std::sync::Arc;

use kernel::id::UserId;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::entity::{
    role::Role,
    user::{IdentityUser, User},
};
use crate::domain::repository::{RoleRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    role_name::RoleName,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Demo account definition
pub struct DemoUser {
    pub id: UserId,
    pub email: &'static str,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub role: RoleName,
}

/// One demo account per role; the user name is the e-mail address.
pub const DEMO_USERS: [DemoUser; 3] = [
    DemoUser {
        id: UserId::from_uuid(Uuid::from_u128(0xbbf188cd_0ab9_4d5b_bd06_7ba8daa9bc66)),
        email: "superadmin@example.com",
        first_name: "Steve",
        last_name: "Roy",
        role: RoleName::SuperAdmin,
    },
    DemoUser {
        id: UserId::from_uuid(Uuid::from_u128(0x6298dfff_0c18_4809_a294_eb988e8eba06)),
        email: "admin@example.com",
        first_name: "John",
        last_name: "Mellus",
        role: RoleName::Admin,
    },
    DemoUser {
        id: UserId::from_uuid(Uuid::from_u128(0x2fad4a3e_fa0b_4423_9527_39db72f329ec)),
        email: "user@example.com",
        first_name: "Demo",
        last_name: "User",
        role: RoleName::User,
    },
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub roles_created: usize,
    pub users_created: usize,
}

pub struct SeedIdentityUseCase<U, R>
where
    U: UserRepository,
    R: RoleRepository,
{
    user_repo: Arc<U>,
    role_repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<U, R> SeedIdentityUseCase<U, R>
where
    U: UserRepository,
    R: RoleRepository,
{
    pub fn new(user_repo: Arc<U>, role_repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            role_repo,
            config,
        }
    }

    pub async fn execute(&self) -> AuthResult<SeedReport> {
        let mut report = SeedReport::default();

        for role in Role::all() {
            if self.role_repo.create_if_absent(&role).await? {
                report.roles_created += 1;
            }
        }

        if self.config.seed_demo_users {
            let password = RawPassword::new(
                self.config.demo_user_password.clone(),
                &self.config.password_policy,
            )?;
            let password_hash = UserPassword::from_raw(&password, self.config.pepper())?;

            for demo in &DEMO_USERS {
                if self.seed_user(demo, &password_hash).await? {
                    report.users_created += 1;
                }
            }
        }

        tracing::info!(
            roles_created = report.roles_created,
            users_created = report.users_created,
            "Identity seed completed"
        );

        Ok(report)
    }

    async fn seed_user(&self, demo: &DemoUser, password_hash: &UserPassword) -> AuthResult<bool> {
        if self.user_repo.find_by_id(&demo.id).await?.is_some() {
            return Ok(false);
        }

        let user_name = UserName::new(demo.email)
            .map_err(|e| AuthError::Internal(format!("Invalid demo user name: {e}")))?;
        let email = Email::new(demo.email)?;

        let mut identity = IdentityUser::new(user_name, email, password_hash.clone());
        identity.id = demo.id;
        identity.email_confirmed = true;
        identity.lockout_enabled = false;

        let user = User::new(
            identity,
            demo.first_name,
            demo.last_name,
            demo.role.implied().iter().copied(),
        );

        match self.user_repo.create(&user).await {
            Ok(()) => Ok(true),
            // Same user name registered by someone else
            Err(AuthError::DuplicateUser) => {
                tracing::warn!(user_name = demo.email, "Demo user skipped: name already taken");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
