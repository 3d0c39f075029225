//! Favorites route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use athletica_core::ProductId;

use super::{local_redirect, parse_id};
use crate::db::{FavoriteRepository, ProductRepository, RepositoryError};
use crate::filters;
use crate::middleware::{Flash, OptionalAuth, PageContext, RequireAuth, push_flash};
use crate::models::{Favorite, LineSnapshot};
use crate::services::favorites;
use crate::state::AppState;

/// Toggle favorite form data.
#[derive(Debug, Deserialize)]
pub struct ToggleFavoriteForm {
    pub product_id: String,
    pub redirect_to: Option<String>,
}

/// Favorites page template.
#[derive(Template, WebTemplate)]
#[template(path = "favorites/show.html")]
pub struct FavoritesTemplate {
    pub page: PageContext,
    pub favorites: Vec<Favorite>,
    pub load_failed: bool,
}

/// Display the user's favorites.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
) -> impl IntoResponse {
    let (favorites, load_failed) = match FavoriteRepository::new(state.pool()).list(user.id).await
    {
        Ok(favorites) => (favorites, false),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load favorites");
            (Vec::new(), true)
        }
    };

    FavoritesTemplate {
        page,
        favorites,
        load_failed,
    }
}

/// Add or remove a favorite.
#[instrument(skip(state, session, user))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Form(form): Form<ToggleFavoriteForm>,
) -> Response {
    let Some(user) = user else {
        push_flash(&session, Flash::error("Please login to manage favorites")).await;
        return Redirect::to("/login").into_response();
    };
    let back = local_redirect(form.redirect_to.as_deref(), "/favorites");

    let Some(product_id) = parse_id::<ProductId>(&form.product_id) else {
        push_flash(&session, Flash::error("Product not found")).await;
        return back.into_response();
    };

    // Removal must work for products that have left the catalog.
    let snapshot = match ProductRepository::new(state.pool()).get(product_id).await {
        Ok(product) => product.as_ref().map(LineSnapshot::from),
        Err(e) => {
            tracing::error!(%product_id, error = %e, "Failed to load product for favorite");
            push_flash(&session, Flash::error("Could not update favorites")).await;
            return back.into_response();
        }
    };

    let repo = FavoriteRepository::new(state.pool());
    match favorites::toggle(&repo, user.id, product_id, snapshot.as_ref()).await {
        Ok(toggled) => {
            tracing::info!(user_id = %user.id, %product_id, ?toggled, "Favorite toggled");
            push_flash(&session, Flash::success(toggled.message())).await;
        }
        Err(RepositoryError::NotFound) => {
            push_flash(&session, Flash::error("Product not found")).await;
        }
        Err(e) => {
            tracing::error!(user_id = %user.id, %product_id, error = %e, "Failed to toggle favorite");
            push_flash(&session, Flash::error("Could not update favorites")).await;
        }
    }

    back.into_response()
}
