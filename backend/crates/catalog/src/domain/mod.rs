//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Product)
//! - Domain value objects (Price, ProductDraft)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod value_objects;

pub use entities::Product;
pub use repository::ProductRepository;
pub use value_objects::{Price, PriceError, ProductDraft};
