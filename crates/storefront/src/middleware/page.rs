//! Per-page layout context.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use super::auth::current_user;
use super::flash::{Flash, take_flash};
use crate::models::CurrentUser;

/// Everything `base.html` needs: the navbar user and the pending toast.
///
/// Extracting it consumes the flash, so only page-rendering handlers should
/// ask for it.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
}

impl PageContext {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(CurrentUser::is_admin)
    }

    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self::default());
        };

        Ok(Self {
            user: current_user(session).await,
            flash: take_flash(session).await,
        })
    }
}
