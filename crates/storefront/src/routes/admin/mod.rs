//! Admin back office.
//!
//! Every handler takes [`RequireAdmin`](crate::middleware::RequireAdmin) as
//! its first extractor, so anyone else is redirected to `/` before any other
//! work happens.

pub mod dashboard;
pub mod products;
pub mod users;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Create the admin routes router, nested under `/admin`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/dashboard", get(dashboard::show))
        .route("/products", get(products::index).post(products::create))
        .route("/products/new", get(products::new))
        .route("/products/{id}", post(products::update))
        .route("/products/{id}/edit", get(products::edit))
        .route("/products/{id}/delete", post(products::delete))
        .route("/users", get(users::index))
        .route("/users/{id}/delete", post(users::delete))
}

async fn index(_admin: RequireAdmin) -> Redirect {
    Redirect::to("/admin/dashboard")
}
