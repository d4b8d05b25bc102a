//! Create Product Use Case

use std::sync::Arc;

use crate::domain::{Product, ProductDraft, ProductRepository};
use crate::error::CatalogResult;

pub struct CreateProductUseCase<R>
where
    R: ProductRepository,
{
    repo: Arc<R>,
}

impl<R> CreateProductUseCase<R>
where
    R: ProductRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, draft: ProductDraft) -> CatalogResult<Product> {
        let product = Product::new(draft);
        self.repo.create(&product).await?;

        tracing::info!(
            product_id = %product.id,
            name = %product.name,
            "Product created"
        );

        Ok(product)
    }
}
