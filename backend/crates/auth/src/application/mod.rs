//! Application Layer
//!
//! Use cases and application services.

pub mod change_password;
pub mod check_session;
pub mod config;
pub mod login;
pub mod logout;
pub mod manage_roles;
pub mod register;
pub mod seed_identity;
pub mod session_token;
pub mod status;

// Re-exports
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use check_session::CheckSessionUseCase;
pub use config::AuthConfig;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use manage_roles::{ManageRolesUseCase, RoleChange};
pub use register::{RegisterInput, RegisterUseCase};
pub use seed_identity::{DEMO_USERS, SeedIdentityUseCase, SeedReport};
pub use status::{Status, StatusKind};
