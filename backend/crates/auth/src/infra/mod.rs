//! Infrastructure Layer
//!
//! Repository implementations: PostgreSQL for deployment, in-memory for
//! tests and database-less development.

pub mod memory;
pub mod postgres;
