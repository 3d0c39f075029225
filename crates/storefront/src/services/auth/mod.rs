//! Authentication service.
//!
//! Password registration and login. Passwords are hashed with Argon2id and
//! kept in their own table.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use athletica_core::{Email, Role};

use crate::db::{AdminRepository, RepositoryError, UserRepository};
use crate::middleware::AdminLookup;
use crate::models::{CurrentUser, User};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum full name length, in characters.
pub const MIN_NAME_LENGTH: usize = 3;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    admins: AdminRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
            admins: AdminRepository::new(pool),
        }
    }

    /// Register a new user with name, email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidName` if the name is too short.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let full_name = validate_name(full_name)?;
        let email = Email::parse(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        self.users
            .create_with_password(full_name, &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }

    /// Login with email and password.
    ///
    /// The returned identity carries the role resolved from the admin marker.
    /// If that lookup fails the user is signed in with the plain user role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let role = resolve_role(&self.admins, &user).await;

        Ok(CurrentUser {
            id: user.id,
            email: user.email,
            role,
            full_name: user.full_name,
        })
    }
}

/// Role for a freshly authenticated user.
async fn resolve_role<L: AdminLookup>(lookup: &L, user: &User) -> Role {
    match lookup.admin_marker(user.id).await {
        Ok(marker) => Role::from_marker(marker.as_ref().map(|m| m.role.as_str())),
        Err(e) => {
            tracing::warn!(user_id = %user.id, error = %e, "Admin marker lookup failed at login");
            Role::User
        }
    }
}

/// Trim the name and check its length.
fn validate_name(full_name: &str) -> Result<&str, AuthError> {
    let trimmed = full_name.trim();
    if trimmed.chars().count() < MIN_NAME_LENGTH {
        return Err(AuthError::InvalidName(format!(
            "Full name must be at least {MIN_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed)
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use athletica_core::UserId;
    use chrono::Utc;

    use super::*;
    use crate::models::AdminMarker;

    struct Markers(Result<Option<&'static str>, ()>);

    impl AdminLookup for Markers {
        async fn admin_marker(
            &self,
            user_id: UserId,
        ) -> Result<Option<AdminMarker>, RepositoryError> {
            match self.0 {
                Ok(role) => Ok(role.map(|r| AdminMarker {
                    user_id,
                    role: r.to_owned(),
                })),
                Err(()) => Err(RepositoryError::NotFound),
            }
        }
    }

    fn user() -> User {
        User {
            id: UserId::new(3),
            full_name: "Riley Runner".to_owned(),
            email: Email::parse("riley@athletica.test").unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("sprint6").unwrap();
        assert!(verify_password("sprint6", &hash).is_ok());
        assert!(matches!(
            verify_password("sprint7", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_corrupt_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_password_length() {
        assert!(matches!(
            validate_password("12345"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_name_is_trimmed_and_checked() {
        assert!(matches!(validate_name("  Al "), Err(AuthError::InvalidName(_))));
        assert_eq!(validate_name("  Ana Lee ").unwrap(), "Ana Lee");
    }

    #[tokio::test]
    async fn test_role_resolution() {
        assert_eq!(resolve_role(&Markers(Ok(Some("admin"))), &user()).await, Role::Admin);
        assert_eq!(resolve_role(&Markers(Ok(Some("staff"))), &user()).await, Role::User);
        assert_eq!(resolve_role(&Markers(Ok(None)), &user()).await, Role::User);
        assert_eq!(resolve_role(&Markers(Err(())), &user()).await, Role::User);
    }

    #[test]
    fn test_user_messages_hide_internals() {
        let err = AuthError::Repository(RepositoryError::DataCorruption("secret".to_owned()));
        assert!(!err.user_message().contains("secret"));
        assert_eq!(
            AuthError::InvalidCredentials.user_message(),
            "Invalid email or password"
        );
    }
}
