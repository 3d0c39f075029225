//! Catalog product types.

use athletica_core::{Price, ProductId};
use chrono::{DateTime, Utc};

/// A product row as shown in the catalog and admin screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub price: Price,
    pub image_url: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub price: Price,
    pub image_url: String,
    pub description: String,
}

impl From<&Product> for NewProduct {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            subcategory: product.subcategory.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            description: product.description.clone(),
        }
    }
}
