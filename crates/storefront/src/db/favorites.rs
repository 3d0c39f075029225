//! Favorites repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use athletica_core::{Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Favorite, LineSnapshot};

#[derive(Debug, sqlx::FromRow)]
struct FavoriteRow {
    product_id: i32,
    name: String,
    price: Decimal,
    image_url: String,
    added_at: DateTime<Utc>,
}

impl TryFrom<FavoriteRow> for Favorite {
    type Error = RepositoryError;

    fn try_from(row: FavoriteRow) -> Result<Self, Self::Error> {
        let price = Price::from_decimal(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid favorite price: {e}"))
        })?;

        Ok(Self {
            product_id: ProductId::new(row.product_id),
            name: row.name,
            price,
            image_url: row.image_url,
            added_at: row.added_at,
        })
    }
}

/// Repository for a user's favorites, keyed by (user, product).
#[derive(Clone, Copy)]
pub struct FavoriteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FavoriteRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Favorite>, RepositoryError> {
        let rows = sqlx::query_as::<_, FavoriteRow>(
            r"
            SELECT product_id, name, price, image_url, added_at
            FROM athletica.favorite
            WHERE user_id = $1
            ORDER BY added_at DESC, product_id
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
    pub async fn contains(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            r"
            SELECT EXISTS (
                SELECT 1 FROM athletica.favorite
                WHERE user_id = $1 AND product_id = $2
            )
            ",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .fetch_one(self.pool)
        .await?;
        Ok(exists)
    }

    /// Store a favorite with a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn put(&self, user_id: UserId, line: &LineSnapshot) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO athletica.favorite (user_id, product_id, name, price, image_url, added_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (user_id, product_id) DO UPDATE
            SET name = EXCLUDED.name,
                price = EXCLUDED.price,
                image_url = EXCLUDED.image_url,
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

    /// Delete a favorite. Returns whether it existed.
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
            sqlx::query("DELETE FROM athletica.favorite WHERE user_id = $1 AND product_id = $2")
                .bind(user_id.as_i32())
                .bind(product_id.as_i32())
                .execute(self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
