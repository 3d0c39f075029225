//! One-shot notifications carried across a redirect.
//!
//! A handler pushes a [`Flash`] before redirecting; the next rendered page
//! takes it out of the session and shows it once.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

impl FlashLevel {
    /// CSS modifier used by the toast markup.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "toast--success",
            Self::Info => "toast--info",
            Self::Error => "toast--error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

/// Queue a notification for the next page. Replaces any pending one.
///
/// Session write failures are logged and otherwise ignored; a lost toast
/// never fails the request that produced it.
pub async fn push_flash(session: &Session, flash: Flash) {
    if let Err(e) = session.insert(session_keys::FLASH, &flash).await {
        tracing::warn!(error = %e, "Failed to store flash message");
    }
}

/// Take the pending notification, if any, removing it from the session.
pub async fn take_flash(session: &Session) -> Option<Flash> {
    match session.remove::<Flash>(session_keys::FLASH).await {
        Ok(flash) => flash,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read flash message");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_flash_is_shown_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        push_flash(&session, Flash::success("Added to cart")).await;

        let flash = take_flash(&session).await.unwrap();
        assert_eq!(flash.level, FlashLevel::Success);
        assert_eq!(flash.message, "Added to cart");
        assert!(take_flash(&session).await.is_none());
    }

    #[tokio::test]
    async fn test_latest_flash_wins() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        push_flash(&session, Flash::info("first")).await;
        push_flash(&session, Flash::error("second")).await;

        assert_eq!(take_flash(&session).await.unwrap().message, "second");
    }
}
