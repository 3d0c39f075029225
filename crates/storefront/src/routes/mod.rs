//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page (category tiles)
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (database)
//!
//! # Catalog
//! GET  /products                  - Listing (?category=&subcategory=&q=)
//! GET  /products/{id}             - Product detail
//!
//! # Cart (requires login)
//! GET  /cart                      - Cart page
//! POST /cart/add                  - Add product (product_id, redirect_to)
//! POST /cart/{id}/increment       - Quantity +1
//! POST /cart/{id}/decrement       - Quantity -1, never below 1
//! POST /cart/{id}/remove          - Remove line
//!
//! # Favorites (requires login)
//! GET  /favorites                 - Favorites page
//! POST /favorites/toggle          - Add or remove (product_id, redirect_to)
//!
//! # Account
//! GET  /profile                   - Profile (requires login)
//! GET  /login, POST /login
//! GET  /register, POST /register
//! POST /logout
//!
//! # Admin (admin marker required)
//! GET  /admin                     - Redirect to dashboard
//! GET  /admin/dashboard
//! GET  /admin/products, POST /admin/products
//! GET  /admin/products/new
//! GET  /admin/products/{id}/edit, POST /admin/products/{id}
//! POST /admin/products/{id}/delete
//! GET  /admin/users
//! POST /admin/users/{id}/delete
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod favorites;
pub mod health;
pub mod home;
pub mod products;

use std::str::FromStr;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the auth routes router.
///
/// Only the form submissions are rate limited.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(post(auth::login).layer(auth_rate_limiter())),
        )
        .route(
            "/register",
            get(auth::register_page).merge(post(auth::register).layer(auth_rate_limiter())),
        )
        .route("/logout", post(auth::logout))
        .route("/profile", get(account::profile))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/{product_id}/increment", post(cart::increment))
        .route("/{product_id}/decrement", post(cart::decrement))
        .route("/{product_id}/remove", post(cart::remove))
}

/// Create the favorites routes router.
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::show))
        .route("/toggle", post(favorites::toggle))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/favorites", favorite_routes())
        .nest("/admin", admin::routes())
        .merge(auth_routes())
}

/// Redirect to `target` when it is a path on this site, else to `fallback`.
pub(crate) fn local_redirect(target: Option<&str>, fallback: &str) -> Redirect {
    Redirect::to(local_target(target).unwrap_or(fallback))
}

/// Accept only same-origin paths: a leading `/`, not `//`, no backslashes.
///
/// Browsers drop tab, CR and LF anywhere in a URL, so `/\t/host` would be
/// read as `//host`. Any control character rejects the target.
fn local_target(target: Option<&str>) -> Option<&str> {
    target.map(str::trim).filter(|t| {
        t.starts_with('/')
            && !t.starts_with("//")
            && !t.contains('\\')
            && !t.chars().any(|c| c.is_ascii_control())
    })
}

/// Parse an id from a path segment or form field.
pub(crate) fn parse_id<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}
