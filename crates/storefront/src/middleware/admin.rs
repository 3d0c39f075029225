//! Admin route guard.
//!
//! `/admin/*` handlers take a [`RequireAdmin`] argument. The extractor lets
//! the request through only when the signed-in user has an admin marker whose
//! role is exactly `admin`. Everyone else is sent to `/` without an error
//! message.

use std::future::Future;

use axum::{extract::FromRequestParts, http::request::Parts, response::Redirect};
use tower_sessions::Session;

use athletica_core::UserId;

use super::auth::current_user;
use crate::db::{AdminRepository, RepositoryError};
use crate::models::{AdminMarker, CurrentUser};
use crate::state::AppState;

/// Source of admin markers.
pub trait AdminLookup {
    fn admin_marker(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<AdminMarker>, RepositoryError>> + Send;
}

impl AdminLookup for AdminRepository<'_> {
    async fn admin_marker(&self, user_id: UserId) -> Result<Option<AdminMarker>, RepositoryError> {
        self.get_marker(user_id).await
    }
}

/// Decide whether `user` may open admin pages.
///
/// No lookup is made for anonymous requests. A failed lookup denies access.
pub async fn is_admin<L: AdminLookup>(lookup: &L, user: Option<&CurrentUser>) -> bool {
    let Some(user) = user else {
        return false;
    };

    match lookup.admin_marker(user.id).await {
        Ok(Some(marker)) => marker.grants_admin(),
        Ok(None) => false,
        Err(e) => {
            tracing::error!(user_id = %user.id, error = %e, "Admin marker lookup failed");
            false
        }
    }
}

/// Extractor that admits only administrators.
///
/// The marker is checked on every request, so revoking it takes effect
/// without waiting for the admin's session to end.
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let home = || Redirect::to("/");

        let session = parts.extensions.get::<Session>().ok_or_else(home)?;
        let user = current_user(session).await;

        let repo = AdminRepository::new(state.pool());
        if !is_admin(&repo, user.as_ref()).await {
            tracing::debug!(path = %parts.uri.path(), "Admin guard redirected request");
            return Err(home());
        }

        user.map(Self).ok_or_else(home)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use athletica_core::{Email, Role};

    use super::*;

    enum Outcome {
        Marker(&'static str),
        Missing,
        Fails,
    }

    struct FakeLookup {
        outcome: Outcome,
        calls: AtomicUsize,
    }

    impl FakeLookup {
        fn new(outcome: Outcome) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl AdminLookup for FakeLookup {
        async fn admin_marker(
            &self,
            user_id: UserId,
        ) -> Result<Option<AdminMarker>, RepositoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                Outcome::Marker(role) => Ok(Some(AdminMarker {
                    user_id,
                    role: role.to_owned(),
                })),
                Outcome::Missing => Ok(None),
                Outcome::Fails => Err(RepositoryError::DataCorruption("boom".to_owned())),
            }
        }
    }

    fn user() -> CurrentUser {
        CurrentUser {
            id: UserId::new(7),
            email: Email::parse("coach@athletica.test").unwrap(),
            role: Role::User,
            full_name: "Casey Coach".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_anonymous_is_denied_without_lookup() {
        let lookup = FakeLookup::new(Outcome::Marker("admin"));
        assert!(!is_admin(&lookup, None).await);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_admin_marker_grants_access() {
        let lookup = FakeLookup::new(Outcome::Marker("admin"));
        assert!(is_admin(&lookup, Some(&user())).await);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_other_roles_are_denied() {
        for role in ["editor", "Admin", ""] {
            let lookup = FakeLookup::new(Outcome::Marker(role));
            assert!(!is_admin(&lookup, Some(&user())).await, "role {role:?}");
        }
    }

    #[tokio::test]
    async fn test_missing_marker_is_denied() {
        let lookup = FakeLookup::new(Outcome::Missing);
        assert!(!is_admin(&lookup, Some(&user())).await);
    }

    #[tokio::test]
    async fn test_lookup_failure_fails_closed() {
        let lookup = FakeLookup::new(Outcome::Fails);
        assert!(!is_admin(&lookup, Some(&user())).await);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }
}
