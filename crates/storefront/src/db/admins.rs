//! Admin marker repository.

use sqlx::PgPool;

use athletica_core::{ADMIN_ROLE, UserId};

use super::RepositoryError;
use crate::models::AdminMarker;

#[derive(Debug, sqlx::FromRow)]
struct AdminRow {
    user_id: i32,
    role: String,
}

impl From<AdminRow> for AdminMarker {
    fn from(row: AdminRow) -> Self {
        Self {
            user_id: UserId::new(row.user_id),
            role: row.role,
        }
    }
}

/// Repository for the role markers that unlock `/admin`.
#[derive(Clone, Copy)]
pub struct AdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The marker for a user, if one exists. The role is returned verbatim.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_marker(&self, user_id: UserId) -> Result<Option<AdminMarker>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT user_id, role FROM athletica.admin WHERE user_id = $1",
        )
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Write an `admin` marker, replacing any existing role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn grant(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO athletica.admin (user_id, role)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET role = EXCLUDED.role
            ",
        )
        .bind(user_id.as_i32())
        .bind(ADMIN_ROLE)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Remove the marker. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn revoke(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM athletica.admin WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
