//! Shared helpers for end-to-end tests of the Athletica storefront.
//!
//! # Running Tests
//!
//! ```bash
//! athletica-cli migrate
//! cargo run -p athletica-storefront &
//! cargo test -p athletica-integration-tests -- --ignored
//! ```
//!
//! The server URL comes from `ATHLETICA_TEST_URL` (default
//! `http://localhost:3000`); fixtures are written straight to the database
//! named by `ATHLETICA_DATABASE_URL`.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use athletica_core::{Email, Price, ProductId};
use athletica_storefront::db::{self, AdminRepository, ProductRepository, UserRepository};
use athletica_storefront::models::{NewProduct, Product};
use reqwest::header::{HeaderMap, HeaderValue, LOCATION};
use reqwest::{Client, Response, StatusCode, redirect::Policy};
use secrecy::SecretString;
use sqlx::PgPool;

/// Password used for every account the tests register.
pub const TEST_PASSWORD: &str = "training-day-42";

/// Base URL of the running storefront.
#[must_use]
pub fn base_url() -> String {
    std::env::var("ATHLETICA_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Pool for fixture setup and teardown.
pub async fn pool() -> PgPool {
    dotenvy::dotenv().ok();
    let url = std::env::var("ATHLETICA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("ATHLETICA_DATABASE_URL must be set for integration tests");
    db::create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to test database")
}

/// A browser-like client: keeps cookies, does not follow redirects.
///
/// Each client claims its own `X-Forwarded-For` address so it gets a
/// separate login rate-limit bucket.
#[must_use]
pub fn client() -> Client {
    let [a, b, c, ..] = *uuid::Uuid::new_v4().as_bytes();
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-forwarded-for",
        HeaderValue::from_str(&format!("10.{a}.{b}.{c}")).expect("valid header value"),
    );

    Client::builder()
        .default_headers(headers)
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// A fresh address so reruns never collide.
#[must_use]
pub fn unique_email() -> String {
    format!("athlete-{}@athletica.test", uuid::Uuid::new_v4().simple())
}

/// Assert a 303 and return its `Location`.
#[must_use]
pub fn redirect_target(response: &Response) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "expected a redirect");
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("redirect without Location")
        .to_owned()
}

/// GET a path and return the body text.
pub async fn page(client: &Client, path: &str) -> String {
    client
        .get(format!("{}{path}", base_url()))
        .send()
        .await
        .expect("GET failed")
        .text()
        .await
        .expect("Failed to read body")
}

/// POST a form and return the raw response.
pub async fn post_form(client: &Client, path: &str, form: &[(&str, &str)]) -> Response {
    client
        .post(format!("{}{path}", base_url()))
        .form(form)
        .send()
        .await
        .expect("POST failed")
}

/// Register `email` through the form.
pub async fn register(client: &Client, email: &str) -> Response {
    post_form(
        client,
        "/register",
        &[
            ("full_name", "Test Athlete"),
            ("email", email),
            ("password", TEST_PASSWORD),
        ],
    )
    .await
}

/// Log in through the form.
pub async fn login(client: &Client, email: &str) -> Response {
    post_form(
        client,
        "/login",
        &[("email", email), ("password", TEST_PASSWORD)],
    )
    .await
}

/// A registered, signed-in client and its email.
pub async fn signed_in() -> (Client, String) {
    let client = client();
    let email = unique_email();
    register(&client, &email).await;
    let response = login(&client, &email).await;
    assert_eq!(redirect_target(&response), "/");
    (client, email)
}

/// Give the account with `email` an admin marker.
pub async fn grant_admin(pool: &PgPool, email: &str) {
    let email = Email::parse(email).expect("valid email");
    let user = UserRepository::new(pool)
        .get_by_email(&email)
        .await
        .expect("user lookup")
        .expect("user exists");
    AdminRepository::new(pool)
        .grant(user.id)
        .await
        .expect("grant admin");
}

/// Insert a product fixture.
pub async fn create_product(pool: &PgPool, name: &str, cents: u32) -> Product {
    ProductRepository::new(pool)
        .create(&NewProduct {
            name: name.to_owned(),
            category: "Men".to_owned(),
            subcategory: "Shoes".to_owned(),
            price: Price::from_cents(cents),
            image_url: "https://images.athletica.test/shoe.jpg".to_owned(),
            description: "Fixture product".to_owned(),
        })
        .await
        .expect("create product")
}

/// Remove a product fixture, ignoring "already gone".
pub async fn delete_product(pool: &PgPool, id: ProductId) {
    let _ = ProductRepository::new(pool).delete(id).await;
}
