//! Database migration command.
//!
//! Applies `crates/storefront/migrations/` and creates the session table
//! used by `tower-sessions`.

use tower_sessions_sqlx_store::PostgresStore;

use super::{CommandError, connect};

/// Run schema migrations, then the session-store migration.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Running session store migration...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
