//! Form and View Models

use kernel::id::ProductId;
use kernel::validation::ModelState;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Product, ProductDraft};

/// Product form (`Name, Category, Description, Price`)
///
/// Price stays text so an unparsable value can be echoed back with its error.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProductForm {
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: String,
}

impl ProductForm {
    pub fn validate(&self) -> Result<ProductDraft, ModelState> {
        ProductDraft::new(&self.name, &self.category, &self.description, &self.price)
    }
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
        }
    }
}

/// Product as shown in Index and Details views
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: Decimal,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            price: product.price.amount(),
        }
    }
}

/// Edit view model: the form plus the id it posts back to
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EditProductModel {
    pub id: ProductId,
    #[serde(flatten)]
    pub form: ProductForm,
}
