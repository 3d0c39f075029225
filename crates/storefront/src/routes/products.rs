//! Catalog route handlers.

use std::collections::HashSet;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use athletica_core::{CATALOG, Category, ProductId};

use super::parse_id;
use crate::db::{FavoriteRepository, ProductRepository};
use crate::error::Result;
use crate::filters;
use crate::middleware::PageContext;
use crate::models::{CurrentUser, Product};
use crate::services::catalog::{self, CatalogQuery};
use crate::state::AppState;

/// Query parameters for the listing.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub q: Option<String>,
}

/// A product tile on the listing.
pub struct ProductCard {
    pub product: Product,
    pub is_favorite: bool,
}

/// One entry in the subcategory filter bar.
pub struct FilterLink {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub categories: &'static [Category],
    pub category: String,
    pub search: String,
    pub filter_links: Vec<FilterLink>,
    pub products: Vec<ProductCard>,
    pub load_failed: bool,
    pub return_to: String,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: Product,
    pub is_favorite: bool,
    pub return_to: String,
}

/// Missing product template.
#[derive(Template, WebTemplate)]
#[template(path = "products/not_found.html")]
pub struct ProductNotFoundTemplate {
    pub page: PageContext,
}

/// Build `/products?...` for a category and optional subcategory.
fn listing_href(category: &str, subcategory: Option<&str>, search: Option<&str>) -> String {
    let mut href = format!("/products?category={}", urlencoding::encode(category));
    if let Some(sub) = subcategory {
        href.push_str("&subcategory=");
        href.push_str(&urlencoding::encode(sub));
    }
    if let Some(q) = search {
        href.push_str("&q=");
        href.push_str(&urlencoding::encode(q));
    }
    href
}

/// "All" plus one link per subcategory of a known category.
fn filter_links(query: &CatalogQuery) -> Vec<FilterLink> {
    let mut links = vec![FilterLink {
        label: "All".to_owned(),
        href: listing_href(&query.category, None, query.search.as_deref()),
        active: query.subcategory.is_none(),
    }];

    if let Some(category) = query.known_category() {
        links.extend(category.subcategories.iter().map(|sub| FilterLink {
            label: (*sub).to_owned(),
            href: listing_href(&query.category, Some(*sub), query.search.as_deref()),
            active: query.subcategory.as_deref() == Some(*sub),
        }));
    }

    links
}

/// Product ids the signed-in user has favorited. Empty on error.
async fn favorite_ids(state: &AppState, user: Option<&CurrentUser>) -> HashSet<ProductId> {
    let Some(user) = user else {
        return HashSet::new();
    };

    match FavoriteRepository::new(state.pool()).list(user.id).await {
        Ok(favorites) => favorites.into_iter().map(|f| f.product_id).collect(),
        Err(e) => {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to load favorites");
            HashSet::new()
        }
    }
}

/// Display the product listing.
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
    Query(params): Query<CatalogParams>,
) -> impl IntoResponse {
    let query = CatalogQuery::from_params(
        params.category.as_deref(),
        params.subcategory.as_deref(),
        params.q.as_deref(),
    );

    let repo = ProductRepository::new(state.pool());
    let (products, load_failed) = match catalog::fetch(&repo, &query).await {
        Ok(products) => (products, false),
        Err(e) => {
            tracing::error!(category = %query.category, error = %e, "Failed to load products");
            (Vec::new(), true)
        }
    };

    let favorites = favorite_ids(&state, page.user.as_ref()).await;
    let products = products
        .into_iter()
        .map(|product| ProductCard {
            is_favorite: favorites.contains(&product.id),
            product,
        })
        .collect();

    ProductsIndexTemplate {
        filter_links: filter_links(&query),
        return_to: listing_href(
            &query.category,
            query.subcategory.as_deref(),
            query.search.as_deref(),
        ),
        search: query.search.clone().unwrap_or_default(),
        category: query.category,
        categories: CATALOG,
        products,
        load_failed,
        page,
    }
}

/// Display a single product.
///
/// Unknown ids render the not-found page with a 404.
#[instrument(skip(state, page))]
pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    Path(id): Path<String>,
) -> Result<Response> {
    let Some(id) = parse_id::<ProductId>(&id) else {
        return Ok(not_found(page));
    };

    let Some(product) = ProductRepository::new(state.pool()).get(id).await? else {
        return Ok(not_found(page));
    };

    let is_favorite = favorite_ids(&state, page.user.as_ref())
        .await
        .contains(&product.id);

    Ok(ProductShowTemplate {
        return_to: format!("/products/{}", product.id),
        product,
        is_favorite,
        page,
    }
    .into_response())
}

fn not_found(page: PageContext) -> Response {
    (StatusCode::NOT_FOUND, ProductNotFoundTemplate { page }).into_response()
}
