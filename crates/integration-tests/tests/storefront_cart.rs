//! Cart and favorites flows against a running storefront.

#![allow(clippy::unwrap_used)]

use athletica_integration_tests::{
    create_product, delete_product, page, pool, post_form, redirect_target, signed_in,
};

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_add_increment_decrement_remove() {
    let pool = pool().await;
    let product = create_product(&pool, "Cart Runner", 4999).await;
    let id = product.id.to_string();
    let (client, _) = signed_in().await;

    let response = post_form(&client, "/cart/add", &[("product_id", id.as_str())]).await;
    assert_eq!(redirect_target(&response), "/cart");
    let cart = page(&client, "/cart").await;
    assert!(cart.contains("Cart Runner added to cart"));
    assert!(cart.contains("$49.99"));

    post_form(&client, &format!("/cart/{id}/increment"), &[]).await;
    assert!(page(&client, "/cart").await.contains("$99.98"));

    post_form(&client, &format!("/cart/{id}/decrement"), &[]).await;
    post_form(&client, &format!("/cart/{id}/decrement"), &[]).await;
    let cart = page(&client, "/cart").await;
    assert!(cart.contains("$49.99"));
    assert!(!cart.contains("$99.98"));

    post_form(&client, &format!("/cart/{id}/remove"), &[]).await;
    assert!(page(&client, "/cart").await.contains("Start Shopping"));

    delete_product(&pool, product.id).await;
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_favorite_toggle_twice_restores_state() {
    let pool = pool().await;
    let product = create_product(&pool, "Favorite Trainer", 8900).await;
    let id = product.id.to_string();
    let (client, _) = signed_in().await;

    let form = [("product_id", id.as_str()), ("redirect_to", "/favorites")];

    let response = post_form(&client, "/favorites/toggle", &form).await;
    assert_eq!(redirect_target(&response), "/favorites");
    let favorites = page(&client, "/favorites").await;
    assert!(favorites.contains("Added to favorites"));
    assert!(favorites.contains("Favorite Trainer"));

    post_form(&client, "/favorites/toggle", &form).await;
    let favorites = page(&client, "/favorites").await;
    assert!(favorites.contains("Removed from favorites"));
    assert!(favorites.contains("You have no favorites yet."));

    delete_product(&pool, product.id).await;
}
