//! Catalog (Product) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Product entity, validated drafts, repository trait
//! - `application/` - Create, query, update, delete use cases
//! - `infra/` - PostgreSQL and in-memory stores
//! - `presentation/` - HTTP handlers, form models, router
//!
//! Field validation happens while building a `ProductDraft`, before any
//! store call. Absent ids surface as `CatalogError::NotFound` (404).

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use error::{CatalogError, CatalogResult};
pub use infra::{memory::MemoryProductRepository, postgres::PgProductRepository};
pub use presentation::router::{catalog_router, catalog_router_generic};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}
