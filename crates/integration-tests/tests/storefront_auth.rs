//! Registration, login and logout against a running storefront.

#![allow(clippy::unwrap_used)]

use athletica_integration_tests::{
    client, login, page, post_form, redirect_target, register, signed_in, unique_email,
};

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_register_then_login() {
    let client = client();
    let email = unique_email();

    let response = register(&client, &email).await;
    assert_eq!(redirect_target(&response), "/login");
    assert!(page(&client, "/login").await.contains("User registered successfully"));

    let response = login(&client, &email).await;
    assert_eq!(redirect_target(&response), "/");

    let home = page(&client, "/").await;
    assert!(home.contains("Login successful"));
    assert!(home.contains("Test Athlete"));
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_duplicate_registration_is_rejected() {
    let client = client();
    let email = unique_email();
    register(&client, &email).await;

    let response = register(&client, &email).await;
    assert_eq!(redirect_target(&response), "/register");
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_wrong_password_is_generic() {
    let client = client();
    let email = unique_email();
    register(&client, &email).await;

    let response = post_form(
        &client,
        "/login",
        &[("email", email.as_str()), ("password", "not-the-password")],
    )
    .await;
    assert_eq!(redirect_target(&response), "/login");
    assert!(page(&client, "/login").await.contains("Invalid email or password"));
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_logout_ends_session() {
    let (client, _) = signed_in().await;
    assert!(page(&client, "/profile").await.contains("My Profile"));

    let response = post_form(&client, "/logout", &[]).await;
    assert_eq!(redirect_target(&response), "/");

    let response = client
        .get(format!("{}/profile", athletica_integration_tests::base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(redirect_target(&response), "/login");
}
