//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::ProductId;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Price, Product, ProductRepository};
use crate::error::{CatalogError, CatalogResult};

/// PostgreSQL-backed product repository
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ProductRepository for PgProductRepository {
    async fn create(&self, product: &Product) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id,
                name,
                category,
                description,
                price,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(product.id.into_uuid())
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.description)
        .bind(product.price.amount())
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ProductId) -> CatalogResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, category, description, price, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    async fn list(&self) -> CatalogResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, category, description, price, created_at, updated_at
            FROM products
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    async fn update(&self, product: &Product) -> CatalogResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE products SET
                name = $2,
                category = $3,
                description = $4,
                price = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(product.id.into_uuid())
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.description)
        .bind(product.price.amount())
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }

    async fn delete(&self, id: &ProductId) -> CatalogResult<bool> {
        let deleted = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    category: String,
    description: String,
    price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> CatalogResult<Product> {
        let price = Price::new(self.price)
            .map_err(|e| CatalogError::Internal(format!("Stored price for {}: {e}", self.id)))?;

        Ok(Product {
            id: ProductId::from_uuid(self.id),
            name: self.name,
            category: self.category,
            description: self.description,
            price,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
