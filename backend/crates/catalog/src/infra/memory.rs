//! In-Memory Repository Implementation

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::ProductId;
use tokio::sync::RwLock;

use crate::domain::{Product, ProductRepository};
use crate::error::CatalogResult;

/// In-memory product store
#[derive(Clone, Default)]
pub struct MemoryProductRepository {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductRepository for MemoryProductRepository {
    async fn create(&self, product: &Product) -> CatalogResult<()> {
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ProductId) -> CatalogResult<Option<Product>> {
        Ok(self.products.read().await.get(id).cloned())
    }

    async fn list(&self) -> CatalogResult<Vec<Product>> {
        let mut products: Vec<Product> = self.products.read().await.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(products)
    }

    async fn update(&self, product: &Product) -> CatalogResult<bool> {
        let mut products = self.products.write().await;
        match products.get_mut(&product.id) {
            Some(stored) => {
                *stored = product.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ProductId) -> CatalogResult<bool> {
        Ok(self.products.write().await.remove(id).is_some())
    }
}
