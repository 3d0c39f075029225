//! Errors that escape a handler.
//!
//! Most page handlers turn failures into a flash message and a redirect.
//! The few that cannot return [`Result`]; server errors are reported to
//! Sentry and answered with a generic body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "Request failed");
        }

        let message = match &self {
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            _ => status
                .canonical_reason()
                .unwrap_or("Something went wrong")
                .to_owned(),
        };

        (status, message).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Attach the signed-in user to Sentry events.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| scope.set_user(None));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_and_conflict() {
        assert_eq!(
            render(AppError::Database(RepositoryError::NotFound)).await,
            (StatusCode::NOT_FOUND, "Not Found".to_owned())
        );
        assert_eq!(
            render(AppError::Database(RepositoryError::Conflict(
                "email already exists".to_owned()
            )))
            .await,
            (StatusCode::CONFLICT, "email already exists".to_owned())
        );
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let err = AppError::Database(RepositoryError::DataCorruption(
            "invalid email in row 7".to_owned(),
        ));
        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal Server Error");
    }
}
