//! Entity Module

pub mod auth_session;
pub mod current_user;
pub mod role;
pub mod user;
