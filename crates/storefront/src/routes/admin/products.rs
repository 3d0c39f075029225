//! Admin product CRUD.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use athletica_core::{CATALOG, Price, ProductId};

use crate::db::{ProductRepository, RepositoryError};
use crate::filters;
use crate::middleware::{Flash, PageContext, RequireAdmin, push_flash};
use crate::models::{NewProduct, Product};
use crate::routes::parse_id;
use crate::state::AppState;

/// Product form data, exactly as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub price: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
}

impl ProductForm {
    /// Trim fields and coerce the price.
    ///
    /// # Errors
    ///
    /// Returns the message to show above the form.
    pub fn validate(&self) -> Result<NewProduct, String> {
        let required = |value: &str, label: &str| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(format!("{label} is required"))
            } else {
                Ok(trimmed.to_owned())
            }
        };

        let name = required(&self.name, "Name")?;
        let category = required(&self.category, "Category")?;
        let subcategory = required(&self.subcategory, "Subcategory")?;
        let price = Price::parse(&self.price).map_err(|e| format!("Invalid price: {e}"))?;

        Ok(NewProduct {
            name,
            category,
            subcategory,
            price,
            image_url: self.image_url.trim().to_owned(),
            description: self.description.trim().to_owned(),
        })
    }
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            subcategory: product.subcategory.clone(),
            price: product.price.amount().to_string(),
            image_url: product.image_url.clone(),
            description: product.description.clone(),
        }
    }
}

/// A `<select>` option.
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

/// Subcategory options grouped by category.
pub struct OptionGroup {
    pub label: String,
    pub options: Vec<SelectOption>,
}

/// Category and subcategory choices for the form.
///
/// Values outside the fixed catalog are kept as extra choices so editing a
/// product never silently changes them.
fn form_choices(form: &ProductForm) -> (Vec<SelectOption>, Vec<OptionGroup>) {
    let mut categories: Vec<SelectOption> = CATALOG
        .iter()
        .map(|c| SelectOption {
            value: c.name.to_owned(),
            selected: c.name == form.category,
        })
        .collect();

    let mut groups: Vec<OptionGroup> = CATALOG
        .iter()
        .map(|c| OptionGroup {
            label: c.name.to_owned(),
            options: c
                .subcategories
                .iter()
                .map(|sub| SelectOption {
                    value: (*sub).to_owned(),
                    selected: c.name == form.category && *sub == form.subcategory,
                })
                .collect(),
        })
        .collect();

    let known_pair = groups.iter().flat_map(|g| &g.options).any(|o| o.selected);
    if !form.category.is_empty() && !categories.iter().any(|c| c.selected) {
        categories.push(SelectOption {
            value: form.category.clone(),
            selected: true,
        });
    }
    if !form.subcategory.is_empty() && !known_pair {
        groups.push(OptionGroup {
            label: "Current".to_owned(),
            options: vec![SelectOption {
                value: form.subcategory.clone(),
                selected: true,
            }],
        });
    }

    (categories, groups)
}

/// Product list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub products: Vec<Product>,
    pub load_failed: bool,
}

/// Create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/form.html")]
pub struct ProductFormTemplate {
    pub page: PageContext,
    pub title: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub form: ProductForm,
    pub categories: Vec<SelectOption>,
    pub subcategory_groups: Vec<OptionGroup>,
    pub error: Option<String>,
}

impl ProductFormTemplate {
    fn create(page: PageContext, form: ProductForm, error: Option<String>) -> Self {
        let (categories, subcategory_groups) = form_choices(&form);
        Self {
            page,
            title: "Add Product",
            action: "/admin/products".to_owned(),
            submit_label: "Add Product",
            form,
            categories,
            subcategory_groups,
            error,
        }
    }

    fn edit(page: PageContext, id: ProductId, form: ProductForm, error: Option<String>) -> Self {
        let (categories, subcategory_groups) = form_choices(&form);
        Self {
            page,
            title: "Edit Product",
            action: format!("/admin/products/{id}"),
            submit_label: "Save Changes",
            form,
            categories,
            subcategory_groups,
            error,
        }
    }
}

/// List every product.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    page: PageContext,
) -> impl IntoResponse {
    let (products, load_failed) = match ProductRepository::new(state.pool()).list_all().await {
        Ok(products) => (products, false),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list products");
            (Vec::new(), true)
        }
    };

    ProductsIndexTemplate {
        page,
        products,
        load_failed,
    }
}

/// Empty product form.
#[instrument(skip_all)]
pub async fn new(_admin: RequireAdmin, page: PageContext) -> impl IntoResponse {
    ProductFormTemplate::create(page, ProductForm::default(), None)
}

/// Create a product from the submitted form.
#[instrument(skip(state, session, page, admin))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    page: PageContext,
    Form(form): Form<ProductForm>,
) -> Response {
    let product = match form.validate() {
        Ok(product) => product,
        Err(message) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                ProductFormTemplate::create(page, form, Some(message)),
            )
                .into_response();
        }
    };

    match ProductRepository::new(state.pool()).create(&product).await {
        Ok(created) => {
            tracing::info!(admin_id = %admin.id, product_id = %created.id, "Product created");
            push_flash(&session, Flash::success("Product added successfully")).await;
            Redirect::to("/admin/products").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create product");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ProductFormTemplate::create(page, form, Some("Could not save product".to_owned())),
            )
                .into_response()
        }
    }
}

/// Form prefilled with a product's current values.
#[instrument(skip_all)]
pub async fn edit(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    session: Session,
    page: PageContext,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_id::<ProductId>(&id) else {
        return missing(&session).await;
    };

    match ProductRepository::new(state.pool()).get(id).await {
        Ok(Some(product)) => {
            ProductFormTemplate::edit(page, id, ProductForm::from(&product), None).into_response()
        }
        Ok(None) => missing(&session).await,
        Err(e) => {
            tracing::error!(product_id = %id, error = %e, "Failed to load product");
            push_flash(&session, Flash::error("Could not load product")).await;
            Redirect::to("/admin/products").into_response()
        }
    }
}

/// Save changes to a product.
#[instrument(skip(state, session, page, admin))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    page: PageContext,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> Response {
    let Some(id) = parse_id::<ProductId>(&id) else {
        return missing(&session).await;
    };

    let product = match form.validate() {
        Ok(product) => product,
        Err(message) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                ProductFormTemplate::edit(page, id, form, Some(message)),
            )
                .into_response();
        }
    };

    match ProductRepository::new(state.pool()).update(id, &product).await {
        Ok(_) => {
            tracing::info!(admin_id = %admin.id, product_id = %id, "Product updated");
            push_flash(&session, Flash::success("Product updated successfully")).await;
            Redirect::to("/admin/products").into_response()
        }
        Err(RepositoryError::NotFound) => missing(&session).await,
        Err(e) => {
            tracing::error!(product_id = %id, error = %e, "Failed to update product");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ProductFormTemplate::edit(page, id, form, Some("Could not save product".to_owned())),
            )
                .into_response()
        }
    }
}

/// Delete a product.
#[instrument(skip(state, session, admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_id::<ProductId>(&id) else {
        return missing(&session).await;
    };

    match ProductRepository::new(state.pool()).delete(id).await {
        Ok(()) => {
            tracing::info!(admin_id = %admin.id, product_id = %id, "Product deleted");
            push_flash(&session, Flash::success("Product deleted")).await;
        }
        Err(RepositoryError::NotFound) => return missing(&session).await,
        Err(e) => {
            tracing::error!(product_id = %id, error = %e, "Failed to delete product");
            push_flash(&session, Flash::error("Could not delete product")).await;
        }
    }

    Redirect::to("/admin/products").into_response()
}

async fn missing(session: &Session) -> Response {
    push_flash(session, Flash::error("Product not found")).await;
    Redirect::to("/admin/products").into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn form(price: &str) -> ProductForm {
        ProductForm {
            name: "  Tempo Tee ".to_owned(),
            category: "Men".to_owned(),
            subcategory: "T-Shirts".to_owned(),
            price: price.to_owned(),
            image_url: " https://img.example/tee.jpg ".to_owned(),
            description: String::new(),
        }
    }

    #[test]
    fn test_validate_coerces_price_and_trims() {
        let product = form("24.5").validate().unwrap();
        assert_eq!(product.name, "Tempo Tee");
        assert_eq!(product.price, Price::from_cents(2450));
        assert_eq!(product.image_url, "https://img.example/tee.jpg");
    }

    #[test]
    fn test_validate_rejects_bad_prices() {
        assert!(form("abc").validate().unwrap_err().starts_with("Invalid price"));
        assert!(form("-1").validate().unwrap_err().contains("negative"));
        assert!(form("").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_prices_beyond_column_range() {
        let err = form("1e20").validate().unwrap_err();
        assert!(err.starts_with("Invalid price"), "{err}");
        assert!(err.contains("9999999999.99"), "{err}");
        assert!(form("9999999999.99").validate().is_ok());
    }

    #[test]
    fn test_validate_requires_name() {
        let mut f = form("10");
        f.name = "   ".to_owned();
        assert_eq!(f.validate().unwrap_err(), "Name is required");
    }

    #[test]
    fn test_form_choices_select_current_pair() {
        let (categories, groups) = form_choices(&form("10"));

        let selected: Vec<&str> = categories
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(selected, vec!["Men"]);

        let picked: Vec<(&str, &str)> = groups
            .iter()
            .flat_map(|g| {
                g.options
                    .iter()
                    .filter(|o| o.selected)
                    .map(move |o| (g.label.as_str(), o.value.as_str()))
            })
            .collect();
        assert_eq!(picked, vec![("Men", "T-Shirts")]);
    }

    #[test]
    fn test_form_choices_keep_free_text_values() {
        let mut f = form("10");
        f.category = "Clearance".to_owned();
        f.subcategory = "Misc".to_owned();

        let (categories, groups) = form_choices(&f);
        assert!(categories.iter().any(|c| c.value == "Clearance" && c.selected));
        let last = groups.last().unwrap();
        assert_eq!(last.options[0].value, "Misc");
        assert!(last.options[0].selected);
    }
}
