//! Seed the catalog from a YAML file.
//!
//! ```yaml
//! - name: Performance Tee
//!   category: Men
//!   subcategory: T-Shirts
//!   price: 24.99
//!   image_url: https://images.example.com/tee.jpg
//!   description: Lightweight training shirt.
//! ```
//!
//! The whole file is validated before anything is written, and the inserts
//! share one transaction.

use std::path::Path;

use athletica_core::{Category, Price};
use athletica_storefront::db::ProductRepository;
use athletica_storefront::models::NewProduct;
use serde::Deserialize;
use tracing::{error, info};

use super::{CommandError, connect};

/// One product entry as written in the seed file.
#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    pub category: String,
    pub subcategory: String,
    /// Either a YAML number or a string such as `"$24.99"`.
    pub price: serde_yaml::Value,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
}

impl SeedProduct {
    fn price_text(&self) -> Option<String> {
        match &self.price {
            serde_yaml::Value::Number(n) => Some(n.to_string()),
            serde_yaml::Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn validate(&self) -> Result<NewProduct, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("name is required".to_owned());
        }
        if !Category::is_known_pair(&self.category, &self.subcategory) {
            return Err(format!(
                "{name}: unknown category {} / {}",
                self.category, self.subcategory
            ));
        }
        let price = self
            .price_text()
            .ok_or_else(|| format!("{name}: price must be a number"))
            .and_then(|text| Price::parse(&text).map_err(|e| format!("{name}: {e}")))?;

        Ok(NewProduct {
            name: name.to_owned(),
            category: self.category.clone(),
            subcategory: self.subcategory.clone(),
            price,
            image_url: self.image_url.trim().to_owned(),
            description: self.description.trim().to_owned(),
        })
    }
}

/// Validate every entry, collecting all problems.
///
/// # Errors
///
/// Returns one message per invalid entry.
pub fn prepare(entries: &[SeedProduct]) -> Result<Vec<NewProduct>, Vec<String>> {
    let (ok, errors): (Vec<_>, Vec<_>) = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| entry.validate().map_err(|e| format!("entry {}: {e}", i + 1)))
        .partition(Result::is_ok);

    if errors.is_empty() {
        Ok(ok.into_iter().filter_map(Result::ok).collect())
    } else {
        Err(errors.into_iter().filter_map(Result::err).collect())
    }
}

/// Insert the products listed in `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any entry is
/// invalid, or an insert fails. Inserts run in one transaction.
pub async fn products(path: &Path) -> Result<(), CommandError> {
    info!(path = %path.display(), "Loading products from file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let entries: Vec<SeedProduct> = serde_yaml::from_str(&content)?;
    info!(entries = entries.len(), "Parsed seed file");

    let products = prepare(&entries).map_err(|errors| {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        CommandError::Validation(errors.len())
    })?;

    let pool = connect().await?;
    let repo = ProductRepository::new(&pool);
    let created = repo.create_all(&products).await?;
    for product in &created {
        info!(id = %product.id, name = %product.name, price = %product.price, "Inserted product");
    }

    info!(inserted = created.len(), "Seeding complete!");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Vec<SeedProduct> {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_prices_are_coerced_from_numbers_and_strings() {
        let entries = parse(
            r#"
- name: Performance Tee
  category: Men
  subcategory: T-Shirts
  price: 24.99
- name: Yoga Mat
  category: Equipment
  subcategory: Yoga Mats
  price: "$39.5"
"#,
        );

        let products = prepare(&entries).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price.to_string(), "$24.99");
        assert_eq!(products[1].price.to_string(), "$39.50");
        assert!(products[1].description.is_empty());
    }

    #[test]
    fn test_all_problems_are_reported() {
        let entries = parse(
            r"
- name: Mystery
  category: Men
  subcategory: Dumbbells
  price: 10
- name: Free Lunch
  category: Kids
  subcategory: Shorts
  price: -1
- name: Good Cap
  category: Bags & Accessories
  subcategory: Caps
  price: 15
- name: Listed
  category: Women
  subcategory: Tops
  price: [1, 2]
",
        );

        let errors = prepare(&entries).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("entry 1:"));
        assert!(errors[1].contains("negative"));
        assert!(errors[2].contains("must be a number"));
    }

    #[test]
    fn test_prices_beyond_column_range_are_reported() {
        let entries = parse(
            r#"
- name: Gold Bar
  category: Equipment
  subcategory: Dumbbells
  price: 1e20
- name: Priciest Allowed
  category: Equipment
  subcategory: Dumbbells
  price: "9999999999.99"
"#,
        );

        let errors = prepare(&entries).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("entry 1: Gold Bar:"), "{}", errors[0]);
        assert!(errors[0].contains("cannot exceed"), "{}", errors[0]);
    }
}
