//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use athletica_core::{CATALOG, Category};

use crate::filters;
use crate::middleware::PageContext;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub categories: &'static [Category],
}

/// Display the home page.
#[instrument(skip_all)]
pub async fn home(page: PageContext) -> impl IntoResponse {
    HomeTemplate {
        page,
        categories: CATALOG,
    }
}
