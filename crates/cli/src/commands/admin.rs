//! Admin marker management.
//!
//! The account must already exist; register it through the shop first.

use athletica_core::Email;
use athletica_storefront::db::{AdminRepository, UserRepository};
use athletica_storefront::models::User;
use sqlx::PgPool;

use super::{CommandError, connect};

async fn find_user(pool: &PgPool, email: &str) -> Result<User, CommandError> {
    let email = Email::parse(email)?;
    UserRepository::new(pool)
        .get_by_email(&email)
        .await?
        .ok_or_else(|| CommandError::UserNotFound(email.to_string()))
}

/// Write an admin marker for the account with `email`.
///
/// # Errors
///
/// Returns an error for an invalid or unknown email, or a database failure.
pub async fn grant(email: &str) -> Result<(), CommandError> {
    let pool = connect().await?;
    let user = find_user(&pool, email).await?;

    AdminRepository::new(&pool).grant(user.id).await?;

    tracing::info!(user_id = %user.id, email = %user.email, "Admin access granted");
    Ok(())
}

/// Delete the admin marker for the account with `email`.
///
/// # Errors
///
/// Returns an error for an invalid or unknown email, or a database failure.
pub async fn revoke(email: &str) -> Result<(), CommandError> {
    let pool = connect().await?;
    let user = find_user(&pool, email).await?;

    if AdminRepository::new(&pool).revoke(user.id).await? {
        tracing::info!(user_id = %user.id, email = %user.email, "Admin access revoked");
    } else {
        tracing::warn!(email = %user.email, "Account had no admin marker");
    }
    Ok(())
}
