//! Domain models for the storefront.
//!
//! These are validated domain objects, separate from the row types the
//! repositories decode.

pub mod cart;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{CartItem, Favorite, LineSnapshot};
pub use product::{NewProduct, Product};
pub use session::{CurrentUser, keys as session_keys};
pub use user::{AdminMarker, User};
