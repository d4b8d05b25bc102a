//! Repository Traits

use kernel::id::ProductId;

use crate::domain::entities::Product;
use crate::error::CatalogResult;

/// Product repository trait
#[trait_variant::make(ProductRepository: Send)]
pub trait LocalProductRepository {
    async fn create(&self, product: &Product) -> CatalogResult<()>;

    async fn find_by_id(&self, id: &ProductId) -> CatalogResult<Option<Product>>;

    /// All products ordered by name
    async fn list(&self) -> CatalogResult<Vec<Product>>;

    /// Returns `false` when no product has this id
    async fn update(&self, product: &Product) -> CatalogResult<bool>;

    /// Returns `false` when no product has this id
    async fn delete(&self, id: &ProductId) -> CatalogResult<bool>;
}
