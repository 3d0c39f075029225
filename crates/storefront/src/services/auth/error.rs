//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] athletica_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Full name missing or too short.
    #[error("name validation failed: {0}")]
    InvalidName(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Text for the notification shown to the visitor.
    ///
    /// Internal failures are reduced to a generic message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidEmail(e) => format!("Invalid email: {e}"),
            Self::InvalidCredentials => "Invalid email or password".to_owned(),
            Self::UserAlreadyExists => "An account with this email already exists".to_owned(),
            Self::WeakPassword(msg) | Self::InvalidName(msg) => msg.clone(),
            Self::Repository(_) | Self::PasswordHash => {
                "Something went wrong, please try again".to_owned()
            }
        }
    }
}
