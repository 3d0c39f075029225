//! User domain types.

use athletica_core::{ADMIN_ROLE, Email, UserId};
use chrono::{DateTime, Utc};

/// A registered shopper or administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

/// Role marker row keyed by user id.
///
/// The role is free text; only [`ADMIN_ROLE`] grants access to `/admin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminMarker {
    pub user_id: UserId,
    pub role: String,
}

impl AdminMarker {
    #[must_use]
    pub fn grants_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}
