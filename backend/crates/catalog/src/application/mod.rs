//! Application Layer
//!
//! Product use cases.

pub mod create_product;
pub mod delete_product;
pub mod query_products;
pub mod update_product;

pub use create_product::CreateProductUseCase;
pub use delete_product::DeleteProductUseCase;
pub use query_products::QueryProductsUseCase;
pub use update_product::UpdateProductUseCase;
