//! Domain Entities

use chrono::{DateTime, Utc};
use kernel::id::ProductId;

use crate::domain::value_objects::{Price, ProductDraft};

/// Product entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: Price,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(draft: ProductDraft) -> Self {
        let now = Utc::now();
        let mut product = Self {
            id: ProductId::new(),
            name: String::new(),
            category: String::new(),
            description: String::new(),
            price: Price::ZERO,
            created_at: now,
            updated_at: now,
        };
        product.apply(draft);
        product.updated_at = now;
        product
    }

    /// Replace the editable fields
    pub fn apply(&mut self, draft: ProductDraft) {
        self.name = draft.name().to_string();
        self.category = draft.category().to_string();
        self.description = draft.description().to_string();
        self.price = draft.price();
        self.updated_at = Utc::now();
    }
}
