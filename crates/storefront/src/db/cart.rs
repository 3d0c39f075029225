//! Cart line repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use athletica_core::{Price, ProductId, Quantity, UserId};

use super::RepositoryError;
use crate::models::{CartItem, LineSnapshot};

#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    product_id: i32,
    name: String,
    price: Decimal,
    image_url: String,
    quantity: i32,
    added_at: DateTime<Utc>,
}

impl TryFrom<CartItemRow> for CartItem {
    type Error = RepositoryError;

    fn try_from(row: CartItemRow) -> Result<Self, Self::Error> {
        let price = Price::from_decimal(row.price)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid cart price: {e}")))?;
        let quantity = Quantity::new(row.quantity).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("invalid cart quantity: {}", row.quantity))
        })?;

        Ok(Self {
            product_id: ProductId::new(row.product_id),
            name: row.name,
            price,
            image_url: row.image_url,
            quantity,
            added_at: row.added_at,
        })
    }
}

/// Repository for a user's cart lines, keyed by (user, product).
#[derive(Clone, Copy)]
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every line in the user's cart, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<CartItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT product_id, name, price, image_url, quantity, added_at
            FROM athletica.cart_item
            WHERE user_id = $1
            ORDER BY added_at, product_id
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let row = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT product_id, name, price, image_url, quantity, added_at
            FROM athletica.cart_item
            WHERE user_id = $1 AND product_id = $2
            ",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Write a line with a fresh snapshot at quantity one.
    ///
    /// An existing line for the same product is overwritten, quantity included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn put(&self, user_id: UserId, line: &LineSnapshot) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO athletica.cart_item
                (user_id, product_id, name, price, image_url, quantity, added_at)
            VALUES ($1, $2, $3, $4, $5, 1, NOW())
            ON CONFLICT (user_id, product_id) DO UPDATE
            SET name = EXCLUDED.name,
                price = EXCLUDED.price,
                image_url = EXCLUDED.image_url,
                quantity = 1,
                added_at = EXCLUDED.added_at
            ",
        )
        .bind(user_id.as_i32())
        .bind(line.product_id.as_i32())
        .bind(&line.name)
        .bind(line.price.amount())
        .bind(&line.image_url)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line does not exist.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE athletica.cart_item
            SET quantity = $3
            WHERE user_id = $1 AND product_id = $2
            ",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .bind(quantity.get())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a line. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn remove(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM athletica.cart_item WHERE user_id = $1 AND product_id = $2")
                .bind(user_id.as_i32())
                .bind(product_id.as_i32())
                .execute(self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
