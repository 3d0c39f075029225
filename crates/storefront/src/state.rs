//! Shared handler state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;

/// State handed to every handler through `State<AppState>`.
///
/// `PgPool` is already reference counted, so only the config sits behind an
/// `Arc`.
#[derive(Clone)]
pub struct AppState {
    config: Arc<StorefrontConfig>,
    pool: PgPool,
}

impl AppState {
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        Self {
            config: Arc::new(config),
            pool,
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Pool the repositories borrow from.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}
