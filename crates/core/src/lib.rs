//! Athletica Core - Shared domain types.
//!
//! This crate provides the types used across all Athletica components:
//! - `storefront` - Public shop and the `/admin` back office
//! - `cli` - Migrations, admin role management and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. With the `postgres` feature the newtypes also implement the
//! `sqlx` encode/decode traits so repositories can bind them directly.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, emails, prices, cart quantities, roles and the
//!   category catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
