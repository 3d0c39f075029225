//! Catalog queries.
//!
//! A listing is an equality query on category (and optionally subcategory)
//! followed by a case-insensitive substring match on the product name. The
//! whole matching set is returned; there is no paging.

use std::future::Future;

use athletica_core::{Category, DEFAULT_CATEGORY};

use crate::db::{ProductRepository, RepositoryError};
use crate::models::Product;

/// Source of category-filtered products.
pub trait ProductSource {
    fn products_in(
        &self,
        category: &str,
        subcategory: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send;
}

impl ProductSource for ProductRepository<'_> {
    async fn products_in(
        &self,
        category: &str,
        subcategory: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        self.list_by_category(category, subcategory).await
    }
}

/// A normalized catalog request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub category: String,
    pub subcategory: Option<String>,
    pub search: Option<String>,
}

impl CatalogQuery {
    /// Build a query from raw query-string values.
    ///
    /// Blank values count as absent. A missing category means
    /// [`DEFAULT_CATEGORY`].
    #[must_use]
    pub fn from_params(
        category: Option<&str>,
        subcategory: Option<&str>,
        search: Option<&str>,
    ) -> Self {
        let non_blank = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToOwned::to_owned)
        };

        Self {
            category: non_blank(category).unwrap_or_else(|| DEFAULT_CATEGORY.to_owned()),
            subcategory: non_blank(subcategory),
            search: non_blank(search),
        }
    }

    /// The catalog entry for the requested category, if it is a known one.
    #[must_use]
    pub fn known_category(&self) -> Option<&'static Category> {
        Category::find(&self.category)
    }

    /// Whether a product belongs in this listing.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if product.category != self.category {
            return false;
        }
        if let Some(sub) = &self.subcategory
            && product.subcategory != *sub
        {
            return false;
        }
        self.search.as_deref().is_none_or(|needle| {
            product
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
        })
    }
}

/// Run a catalog query.
///
/// # Errors
///
/// Returns the source's `RepositoryError` unchanged.
pub async fn fetch<S: ProductSource>(
    source: &S,
    query: &CatalogQuery,
) -> Result<Vec<Product>, RepositoryError> {
    let products = source
        .products_in(&query.category, query.subcategory.as_deref())
        .await?;

    Ok(products.into_iter().filter(|p| query.matches(p)).collect())
}
