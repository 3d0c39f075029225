//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use athletica_core::{Email, Role, UserId};

/// Session-stored user identity.
///
/// Written on login and removed on logout. The role is only used to shape
/// navigation; `/admin` access is re-checked against the admin marker on
/// every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    pub role: Role,
    pub full_name: String,
}

impl CurrentUser {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the pending one-shot notification.
    pub const FLASH: &str = "flash";
}
