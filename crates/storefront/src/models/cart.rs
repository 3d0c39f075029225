//! Per-user cart lines and favorites.
//!
//! Both hold a snapshot of the product's name, price and image taken when the
//! row was written, so later catalog edits do not change them.

use athletica_core::{Price, ProductId, Quantity};
use chrono::{DateTime, Utc};

use super::Product;

/// Product fields copied onto a cart line or favorite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSnapshot {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub image_url: String,
}

impl From<&Product> for LineSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub image_url: String,
    pub quantity: Quantity,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favorite {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub image_url: String,
    pub added_at: DateTime<Utc>,
}
