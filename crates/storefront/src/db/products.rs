//! Product repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use athletica_core::{Price, ProductId};

use super::RepositoryError;
use crate::models::{NewProduct, Product};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    category: String,
    subcategory: String,
    price: Decimal,
    image_url: String,
    description: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::from_decimal(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for product {}: {e}", row.id))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            category: row.category,
            subcategory: row.subcategory,
            price,
            image_url: row.image_url,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

/// Product count for one category, as shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

const PRODUCT_COLUMNS: &str =
    "id, name, category, subcategory, price, image_url, description, created_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog queries and admin product CRUD.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM athletica.product ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Products whose category (and subcategory, when given) match exactly.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_category(
        &self,
        category: &str,
        subcategory: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM athletica.product
            WHERE category = $1
              AND ($2::TEXT IS NULL OR subcategory = $2)
            ORDER BY name, id
            "
        ))
        .bind(category)
        .bind(subcategory)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM athletica.product WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Insert a product and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        insert(self.pool, product).await
    }

    /// Insert several products in one transaction. Nothing is stored if any
    /// insert fails.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if an insert or the commit fails.
    pub async fn create_all(
        &self,
        products: &[NewProduct],
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut created = Vec::with_capacity(products.len());
        for product in products {
            created.push(insert(&mut *tx, product).await?);
        }

        tx.commit().await?;

        Ok(created)
    }

    /// Overwrite every editable field of a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    pub async fn update(
        &self,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            UPDATE athletica.product
            SET name = $2, category = $3, subcategory = $4,
                price = $5, image_url = $6, description = $7
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id.as_i32())
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.subcategory)
        .bind(product.price.amount())
        .bind(&product.image_url)
        .bind(&product.description)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a product. Cart and favorite snapshots that reference it stay.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM athletica.product WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM athletica.product")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Product counts grouped by category, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_category(&self) -> Result<Vec<CategoryCount>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryCount>(
            r"
            SELECT category, COUNT(*) AS count
            FROM athletica.product
            GROUP BY category
            ORDER BY category
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}

async fn insert<'e, E>(executor: E, product: &NewProduct) -> Result<Product, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        r"
        INSERT INTO athletica.product
            (name, category, subcategory, price, image_url, description)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {PRODUCT_COLUMNS}
        "
    ))
    .bind(&product.name)
    .bind(&product.category)
    .bind(&product.subcategory)
    .bind(product.price.amount())
    .bind(&product.image_url)
    .bind(&product.description)
    .fetch_one(executor)
    .await?;

    row.try_into()
}
