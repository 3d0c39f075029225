//! Cart route handlers.
//!
//! Every mutation is a single write followed by a redirect back to the page
//! that submitted it. Failures become an error toast.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use athletica_core::ProductId;

use super::{local_redirect, parse_id};
use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::filters;
use crate::middleware::{Flash, OptionalAuth, PageContext, RequireAuth, push_flash};
use crate::models::LineSnapshot;
use crate::services::cart::{Adjustment, CartSummary, adjust_quantity};
use crate::state::AppState;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub redirect_to: Option<String>,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub cart: CartSummary,
    pub load_failed: bool,
}

/// Display cart page.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
) -> impl IntoResponse {
    let (cart, load_failed) = match CartRepository::new(state.pool()).list(user.id).await {
        Ok(lines) => (CartSummary::new(lines), false),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load cart");
            (CartSummary::new(Vec::new()), true)
        }
    };

    CartShowTemplate {
        page,
        cart,
        load_failed,
    }
}

/// Add a product to the cart.
///
/// The line is written with a fresh snapshot of the product at quantity one.
#[instrument(skip(state, session, user))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let Some(user) = user else {
        push_flash(&session, Flash::error("Please login to add items to cart")).await;
        return Redirect::to("/login").into_response();
    };
    let back = form.redirect_to.as_deref();

    let Some(product_id) = parse_id::<ProductId>(&form.product_id) else {
        push_flash(&session, Flash::error("Product not found")).await;
        return local_redirect(back, "/products").into_response();
    };

    let product = match ProductRepository::new(state.pool()).get(product_id).await {
        Ok(Some(product)) => product,
        Ok(None) => {
            push_flash(&session, Flash::error("Product not found")).await;
            return local_redirect(back, "/products").into_response();
        }
        Err(e) => {
            tracing::error!(%product_id, error = %e, "Failed to load product for cart");
            push_flash(&session, Flash::error("Could not add to cart")).await;
            return local_redirect(back, "/products").into_response();
        }
    };

    let snapshot = LineSnapshot::from(&product);
    match CartRepository::new(state.pool()).put(user.id, &snapshot).await {
        Ok(()) => {
            tracing::info!(user_id = %user.id, %product_id, "Added to cart");
            push_flash(&session, Flash::success(format!("{} added to cart", product.name))).await;
        }
        Err(e) => {
            tracing::error!(user_id = %user.id, %product_id, error = %e, "Failed to add to cart");
            push_flash(&session, Flash::error("Could not add to cart")).await;
        }
    }

    local_redirect(back, "/cart").into_response()
}

/// Increase a line's quantity by one.
#[instrument(skip(state, session, user))]
pub async fn increment(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<String>,
) -> Redirect {
    adjust(&state, &session, user.id, &product_id, Adjustment::Increment).await
}

/// Decrease a line's quantity by one. At one, nothing happens.
#[instrument(skip(state, session, user))]
pub async fn decrement(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<String>,
) -> Redirect {
    adjust(&state, &session, user.id, &product_id, Adjustment::Decrement).await
}

async fn adjust(
    state: &AppState,
    session: &Session,
    user_id: athletica_core::UserId,
    raw_id: &str,
    adjustment: Adjustment,
) -> Redirect {
    let Some(product_id) = parse_id::<ProductId>(raw_id) else {
        push_flash(session, Flash::error("Item not found in cart")).await;
        return Redirect::to("/cart");
    };

    let repo = CartRepository::new(state.pool());
    match adjust_quantity(&repo, user_id, product_id, adjustment).await {
        Ok(_) => {}
        Err(RepositoryError::NotFound) => {
            push_flash(session, Flash::error("Item not found in cart")).await;
        }
        Err(e) => {
            tracing::error!(%user_id, %product_id, ?adjustment, error = %e, "Failed to update quantity");
            push_flash(session, Flash::error("Could not update quantity")).await;
        }
    }

    Redirect::to("/cart")
}

/// Remove a line from the cart.
#[instrument(skip(state, session, user))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<String>,
) -> Redirect {
    let Some(product_id) = parse_id::<ProductId>(&product_id) else {
        return Redirect::to("/cart");
    };

    match CartRepository::new(state.pool()).remove(user.id, product_id).await {
        Ok(true) => push_flash(&session, Flash::success("Removed from cart")).await,
        Ok(false) => {}
        Err(e) => {
            tracing::error!(user_id = %user.id, %product_id, error = %e, "Failed to remove from cart");
            push_flash(&session, Flash::error("Could not remove item")).await;
        }
    }

    Redirect::to("/cart")
}
