//! Account roles.

use serde::{Deserialize, Serialize};

/// The role value an admin marker must carry to grant access.
pub const ADMIN_ROLE: &str = "admin";

/// Effective role of a signed-in account.
///
/// Derived from the admin marker at login; anything other than a marker
/// whose role is exactly [`ADMIN_ROLE`] yields [`Role::User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    /// Resolve a role from an optional marker role string.
    #[must_use]
    pub fn from_marker(marker_role: Option<&str>) -> Self {
        match marker_role {
            Some(ADMIN_ROLE) => Self::Admin,
            _ => Self::User,
        }
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => ADMIN_ROLE,
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_exact_admin_marker_grants_admin() {
        assert_eq!(Role::from_marker(Some("admin")), Role::Admin);
        assert_eq!(Role::from_marker(Some("Admin")), Role::User);
        assert_eq!(Role::from_marker(Some("editor")), Role::User);
        assert_eq!(Role::from_marker(Some("")), Role::User);
        assert_eq!(Role::from_marker(None), Role::User);
    }

    #[test]
    fn test_display() {
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(Role::User.to_string(), "user");
    }
}
