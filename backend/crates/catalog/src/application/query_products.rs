//! Product Queries

use std::sync::Arc;

use kernel::id::ProductId;

use crate::domain::{Product, ProductRepository};
use crate::error::{CatalogError, CatalogResult};

pub struct QueryProductsUseCase<R>
where
    R: ProductRepository,
{
    repo: Arc<R>,
}

impl<R> QueryProductsUseCase<R>
where
    R: ProductRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// All products ordered by name
    pub async fn list(&self) -> CatalogResult<Vec<Product>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: &ProductId) -> CatalogResult<Product> {
        self.repo.find_by_id(id).await?.ok_or(CatalogError::NotFound)
    }
}
