//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - PostgreSQL and in-memory stores
//! - `presentation/` - HTTP handlers, form models, router
//!
//! ## Features
//! - Registration with first/last name, user name, email and one role
//! - Login by user name + password, failed-attempt lockout
//! - Server-side sessions referenced by a signed cookie
//! - Fixed roles (User, Admin, SuperAdmin); SuperAdmin manages assignments
//! - Idempotent seeding of roles and demo accounts
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - User names and emails unique after normalization (NFKC + uppercase)
//! - Optimistic concurrency on user updates via concurrency stamps

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::entity::current_user::CurrentUser;
pub use domain::value_object::role_name::RoleName;
pub use error::{AuthError, AuthResult};
pub use infra::{memory::MemoryIdentityRepository, postgres::PgIdentityRepository};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
