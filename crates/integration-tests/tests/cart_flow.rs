//! End-to-end cart tests.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (ff-cli migrate)
//! - The API server running (cargo run -p feastflow-api)
//!
//! Run with: cargo test -p feastflow-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use feastflow_integration_tests::{TestUser, base_url, cart_item};
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};

async fn cart(user: &TestUser) -> Value {
    let resp = user.get("/api/cart").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    body["cart"].clone()
}

async fn add(user: &TestUser, item: &Value) -> Value {
    let resp = user
        .send_json(Method::POST, "/api/cart/items", item)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.unwrap()
}

fn items(cart: &Value) -> &Vec<Value> {
    cart["items"].as_array().unwrap()
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_first_get_creates_empty_cart() {
    let user = TestUser::register().await.unwrap();

    let first = cart(&user).await;
    assert!(items(&first).is_empty());
    assert!(first["restaurant_id"].is_null());

    // Repeat reads return the same cart
    let second = cart(&user).await;
    assert_eq!(first["id"], second["id"]);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_add_merge_and_switch_scenario() {
    let user = TestUser::register().await.unwrap();

    let body = add(&user, &cart_item("m1", "R1", 10.0, 1)).await;
    assert_eq!(body["message"], "Item added to cart");
    let current = cart(&user).await;
    assert_eq!(items(&current).len(), 1);
    assert_eq!(current["restaurant_id"], "R1");
    assert_eq!(items(&current)[0]["quantity"], 1);
    assert_eq!(items(&current)[0]["menu_item_price"], "10.00");

    add(&user, &cart_item("m1", "R1", 10.0, 2)).await;
    let current = cart(&user).await;
    assert_eq!(items(&current).len(), 1);
    assert_eq!(items(&current)[0]["quantity"], 3);

    add(&user, &cart_item("m2", "R2", 7.5, 1)).await;
    let current = cart(&user).await;
    assert_eq!(current["restaurant_id"], "R2");
    assert_eq!(items(&current).len(), 1);
    assert_eq!(items(&current)[0]["menu_item_id"], "m2");
    assert_eq!(items(&current)[0]["quantity"], 1);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_items_share_cart_restaurant() {
    let user = TestUser::register().await.unwrap();

    add(&user, &cart_item("m1", "R1", 4.0, 1)).await;
    add(&user, &cart_item("m2", "R1", 5.0, 1)).await;
    add(&user, &cart_item("m3", "R1", 6.0, 1)).await;

    let current = cart(&user).await;
    assert_eq!(items(&current).len(), 3);
    for item in items(&current) {
        assert_eq!(item["restaurant_id"], current["restaurant_id"]);
    }
    // Newest first
    assert_eq!(items(&current)[0]["menu_item_id"], "m3");
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_update_to_zero_removes_like_delete() {
    let user = TestUser::register().await.unwrap();
    add(&user, &cart_item("m1", "R1", 3.0, 2)).await;
    add(&user, &cart_item("m2", "R1", 3.0, 2)).await;

    let resp = user
        .send_json(Method::PUT, "/api/cart/items/m1", &json!({ "quantity": 0 }))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Item removed from cart");

    let resp = user.delete("/api/cart/items/m2").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let current = cart(&user).await;
    assert!(items(&current).is_empty());

    // Removing again is a 404
    let resp = user.delete("/api/cart/items/m2").await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Item not found in cart");
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_update_quantity() {
    let user = TestUser::register().await.unwrap();
    add(&user, &cart_item("m1", "R1", 3.0, 1)).await;

    let resp = user
        .send_json(Method::PUT, "/api/cart/items/m1", &json!({ "quantity": 5 }))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Cart updated");
    assert_eq!(body["item"]["quantity"], 5);

    let resp = user
        .send_json(Method::PUT, "/api/cart/items/nope", &json!({ "quantity": 2 }))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_update_without_cart_is_404() {
    let user = TestUser::register().await.unwrap();

    let resp = user
        .send_json(Method::PUT, "/api/cart/items/m1", &json!({ "quantity": 2 }))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Cart not found");
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_clear_then_get() {
    let user = TestUser::register().await.unwrap();

    let resp = user.delete("/api/cart").await.unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Cart already empty");

    add(&user, &cart_item("m1", "R1", 3.0, 1)).await;
    let resp = user.delete("/api/cart").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Cart cleared");

    let current = cart(&user).await;
    assert!(items(&current).is_empty());
    assert!(current["restaurant_id"].is_null());
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_concurrent_adds_merge() {
    let user = TestUser::register().await.unwrap();
    let item = cart_item("m1", "R1", 2.0, 1);
    let url = format!("{}/api/cart/items", base_url());

    let mut adds = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let request = user
            .client
            .post(&url)
            .bearer_auth(&user.token)
            .json(&item);
        adds.spawn(request.send());
    }
    while let Some(result) = adds.join_next().await {
        assert_eq!(result.unwrap().unwrap().status(), StatusCode::OK);
    }

    let current = cart(&user).await;
    assert_eq!(items(&current).len(), 1);
    assert_eq!(items(&current)[0]["quantity"], 8);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_merge_past_quantity_limit_is_rejected() {
    let user = TestUser::register().await.unwrap();
    add(&user, &cart_item("m1", "R1", 2.0, 999)).await;

    let resp = user
        .send_json(Method::POST, "/api/cart/items", &cart_item("m1", "R1", 2.0, 1))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Invalid quantity");

    // The rejected merge rolled back
    let current = cart(&user).await;
    assert_eq!(items(&current)[0]["quantity"], 999);
}
