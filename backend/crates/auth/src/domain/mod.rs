//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{auth_session::AuthSession, current_user::CurrentUser, role::Role, user::User};
pub use repository::{AuthSessionRepository, IdentityStore, RoleRepository, UserRepository};
