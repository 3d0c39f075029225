//! Admin dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use athletica_core::CATALOG;

use crate::db::{ProductRepository, UserRepository, products::CategoryCount};
use crate::filters;
use crate::middleware::{PageContext, RequireAdmin};
use crate::state::AppState;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub page: PageContext,
    pub product_count: i64,
    pub user_count: i64,
    pub categories: Vec<CategoryCount>,
    pub load_failed: bool,
}

/// Catalog categories in catalog order, zero-filled, followed by any
/// free-text categories found in the product table.
fn merge_counts(found: Vec<CategoryCount>) -> Vec<CategoryCount> {
    let mut merged: Vec<CategoryCount> = CATALOG
        .iter()
        .map(|c| CategoryCount {
            category: c.name.to_owned(),
            count: found
                .iter()
                .find(|f| f.category == c.name)
                .map_or(0, |f| f.count),
        })
        .collect();

    merged.extend(
        found
            .into_iter()
            .filter(|f| CATALOG.iter().all(|c| c.name != f.category)),
    );
    merged
}

/// Display product and user totals.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    page: PageContext,
) -> impl IntoResponse {
    let products = ProductRepository::new(state.pool());
    let users = UserRepository::new(state.pool());

    let counts = async {
        Ok::<_, crate::db::RepositoryError>((
            products.count().await?,
            users.count().await?,
            products.count_by_category().await?,
        ))
    }
    .await;

    let (product_count, user_count, categories, load_failed) = match counts {
        Ok((p, u, c)) => (p, u, merge_counts(c), false),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load dashboard counts");
            (0, 0, merge_counts(Vec::new()), true)
        }
    };

    DashboardTemplate {
        page,
        product_count,
        user_count,
        categories,
        load_failed,
    }
}
