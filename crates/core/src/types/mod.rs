//! Core types for Athletica.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod price;
pub mod quantity;
pub mod role;

pub use category::{CATALOG, Category, DEFAULT_CATEGORY};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use quantity::Quantity;
pub use role::{ADMIN_ROLE, Role};
