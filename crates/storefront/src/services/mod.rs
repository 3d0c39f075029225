//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Registration and password login
//! - `catalog` - Category/subcategory queries with name search
//! - `cart` - Quantity adjustments and cart totals
//! - `favorites` - Favorite toggling

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod favorites;
