//! End-to-end authentication tests.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (ff-cli migrate)
//! - The API server running (cargo run -p feastflow-api)
//!
//! Run with: cargo test -p feastflow-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use feastflow_integration_tests::{TestUser, base_url, unique_email};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

async fn login(client: &Client, email: &str, password: &str) -> (StatusCode, String) {
    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.text().await.unwrap())
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_register_returns_token_and_public_user() {
    let user = TestUser::register().await.unwrap();

    let resp = user.get("/api/auth/me").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["user"]["email"], user.email.as_str());
    assert_eq!(body["user"]["role"], "customer");
    assert!(body["user"]["createdAt"].is_string());
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_duplicate_registration_rejected() {
    let user = TestUser::register().await.unwrap();

    let resp = Client::new()
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "email": user.email,
            "password": "another-password",
            "firstName": "Again",
            "lastName": "Diner",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "User already exists with this email");

    // The first password still works, so no row was replaced
    let (status, _) = login(&Client::new(), &user.email, &user.password).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_login_failures_are_indistinguishable() {
    let user = TestUser::register().await.unwrap();
    let client = Client::new();

    let (wrong_status, wrong_body) = login(&client, &user.email, "not-the-password").await;
    let (unknown_status, unknown_body) =
        login(&client, &unique_email("nobody"), "not-the-password").await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_cookie_session_and_logout() {
    let user = TestUser::register().await.unwrap();
    let client = Client::builder().cookie_store(true).build().unwrap();

    let (status, _) = login(&client, &user.email, &user.password).await;
    assert_eq!(status, StatusCode::OK);

    // The login cookie alone authenticates
    let resp = client
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(format!("{}/api/auth/logout", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // The cookie now holds "none", which is not a valid token
    let resp = client
        .get(format!("{}/api/cart", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_customer_can_read_dashboard() {
    let user = TestUser::register().await.unwrap();

    let resp = user.get("/api/dashboard/metrics").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["data"]["totalCustomers"].is_number());
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_health_reports_connected_database() {
    let resp = Client::new()
        .get(format!("{}/api/health", base_url()))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["database"], "connected");
    assert_eq!(body["service"], "feastflow-backend");
}
