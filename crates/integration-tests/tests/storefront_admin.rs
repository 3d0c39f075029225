//! Admin guard and product CRUD against a running storefront.

#![allow(clippy::unwrap_used)]

use athletica_integration_tests::{
    base_url, client, grant_admin, login, page, pool, post_form, redirect_target, signed_in,
};

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_non_admin_is_sent_home() {
    let (client, _) = signed_in().await;

    let response = client
        .get(format!("{}/admin/dashboard", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(redirect_target(&response), "/");
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_admin_creates_and_deletes_product() {
    let pool = pool().await;
    let (_, email) = signed_in().await;
    grant_admin(&pool, &email).await;

    let admin = client();
    let response = login(&admin, &email).await;
    assert_eq!(redirect_target(&response), "/admin/dashboard");
    assert!(page(&admin, "/admin/dashboard").await.contains("Welcome Admin"));

    let name = format!("Seeded Sock {}", uuid::Uuid::new_v4().simple());
    let response = post_form(
        &admin,
        "/admin/products",
        &[
            ("name", name.as_str()),
            ("category", "Bags & Accessories"),
            ("subcategory", "Socks"),
            ("price", "$12.5"),
            ("image_url", ""),
            ("description", "Crew socks"),
        ],
    )
    .await;
    assert_eq!(redirect_target(&response), "/admin/products");

    let listing = page(&admin, "/admin/products").await;
    assert!(listing.contains("Product added successfully"));
    assert!(listing.contains(&name));
    assert!(listing.contains("$12.50"));

    let products = athletica_storefront::db::ProductRepository::new(&pool)
        .list_all()
        .await
        .unwrap();
    let created = products.iter().find(|p| p.name == name).unwrap();

    let response = post_form(&admin, &format!("/admin/products/{}/delete", created.id), &[]).await;
    assert_eq!(redirect_target(&response), "/admin/products");
    assert!(page(&admin, "/admin/products").await.contains("Product deleted"));
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_invalid_price_is_not_written() {
    let pool = pool().await;
    let (_, email) = signed_in().await;
    grant_admin(&pool, &email).await;

    let admin = client();
    login(&admin, &email).await;

    let response = post_form(
        &admin,
        "/admin/products",
        &[
            ("name", "Broken Price"),
            ("category", "Men"),
            ("subcategory", "Shorts"),
            ("price", "cheap"),
        ],
    )
    .await;
    assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await.unwrap().contains("Invalid price"));
}
