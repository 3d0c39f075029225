//! Session middleware configuration.
//!
//! Sessions live in `PostgreSQL` (`tower_sessions.session`). The cookie is
//! `HttpOnly`, `SameSite=Lax`, `Secure` behind https and expires after a
//! week without requests. Its value is signed with a key derived from
//! `ATHLETICA_SESSION_SECRET`; a cookie with a bad signature starts a fresh
//! anonymous session.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha512};
use sqlx::PgPool;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "athletica_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// The `tower_sessions.session` table is created by `athletica-cli migrate`.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &StorefrontConfig,
) -> SessionManagerLayer<PostgresStore, SignedCookie> {
    configure(
        PostgresStore::new(pool.clone()),
        config.is_https(),
        &signing_key(&config.session_secret),
    )
}

/// Derive the 64-byte cookie signing key from the configured secret.
#[must_use]
pub fn signing_key(secret: &SecretString) -> Key {
    let digest = Sha512::digest(secret.expose_secret().as_bytes());
    Key::from(digest.as_slice())
}

/// Apply the cookie policy to any store. Tests use an in-memory one.
#[must_use]
pub fn configure<S: SessionStore + Clone>(
    store: S,
    secure: bool,
    key: &Key,
) -> SessionManagerLayer<S, SignedCookie> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key.clone())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::Request,
        http::header::{COOKIE, SET_COOKIE},
        routing::get,
    };
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, Session};

    use super::*;

    const SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

    fn key(secret: &str) -> Key {
        signing_key(&SecretString::from(secret))
    }

    fn app(store: MemoryStore, secure: bool, key: &Key) -> Router {
        Router::new()
            .route(
                "/",
                get(|session: Session| async move {
                    session.insert("touched", true).await.unwrap();
                }),
            )
            .route(
                "/touched",
                get(|session: Session| async move {
                    let touched: Option<bool> = session.get("touched").await.unwrap();
                    touched.unwrap_or(false).to_string()
                }),
            )
            .layer(configure(store, secure, key))
    }

    async fn set_cookie(app: Router) -> String {
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.headers()[SET_COOKIE].to_str().unwrap().to_owned()
    }

    /// The `name=value` pair of a `Set-Cookie` header.
    fn cookie_pair(set_cookie: &str) -> String {
        set_cookie.split(';').next().unwrap().to_owned()
    }

    async fn touched(app: Router, cookie: &str) -> String {
        let response = app
            .oneshot(
                Request::get("/touched")
                    .header(COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_cookie_policy() {
        let cookie = set_cookie(app(MemoryStore::default(), false, &key(SECRET))).await;
        assert!(cookie.starts_with(&format!("{SESSION_COOKIE_NAME}=")));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(!cookie.contains("Secure"));
    }

    #[tokio::test]
    async fn test_https_cookie_is_secure() {
        let cookie = set_cookie(app(MemoryStore::default(), true, &key(SECRET))).await;
        assert!(cookie.contains("Secure"));
    }

    #[test]
    fn test_signing_key_depends_on_secret() {
        assert_eq!(key(SECRET).signing(), key(SECRET).signing());
        assert_ne!(
            key(SECRET).signing(),
            key("zC6%uW4^rT0*pQ7&nL5#mK2@xY9!aB3$").signing()
        );
    }

    #[tokio::test]
    async fn test_signed_cookie_round_trips() {
        let app = app(MemoryStore::default(), false, &key(SECRET));
        let cookie = cookie_pair(&set_cookie(app.clone()).await);

        assert_eq!(touched(app, &cookie).await, "true");
    }

    #[tokio::test]
    async fn test_tampered_cookie_is_ignored() {
        let app = app(MemoryStore::default(), false, &key(SECRET));
        let cookie = cookie_pair(&set_cookie(app.clone()).await);

        let mut tampered = cookie.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert_eq!(touched(app, &tampered).await, "false");
    }

    #[tokio::test]
    async fn test_cookie_signed_with_another_secret_is_ignored() {
        let store = MemoryStore::default();
        let cookie = cookie_pair(&set_cookie(app(store.clone(), false, &key(SECRET))).await);

        let other = app(store, false, &key("zC6%uW4^rT0*pQ7&nL5#mK2@xY9!aB3$"));
        assert_eq!(touched(other, &cookie).await, "false");
    }
}
