//! Update Product Use Case

use std::sync::Arc;

use kernel::id::ProductId;

use crate::domain::{Product, ProductDraft, ProductRepository};
use crate::error::{CatalogError, CatalogResult};

pub struct UpdateProductUseCase<R>
where
    R: ProductRepository,
{
    repo: Arc<R>,
}

impl<R> UpdateProductUseCase<R>
where
    R: ProductRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Absent ids yield `CatalogError::NotFound`.
    pub async fn execute(&self, id: &ProductId, draft: ProductDraft) -> CatalogResult<Product> {
        let mut product = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound)?;

        product.apply(draft);

        // Deleted between the read and the write
        if !self.repo.update(&product).await? {
            return Err(CatalogError::NotFound);
        }

        tracing::info!(product_id = %product.id, "Product updated");

        Ok(product)
    }
}
