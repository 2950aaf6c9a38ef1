//! End-to-end tests for the FeastFlow API.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate a scratch database and start the API
//! ff-cli migrate
//! cargo run -p feastflow-api
//!
//! # Run the ignored end-to-end tests against it
//! API_BASE_URL=http://localhost:5000 cargo test -p feastflow-integration-tests -- --ignored
//! ```
//!
//! Every test registers its own throwaway users, so runs do not interfere
//! with each other or with existing data.

use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL of the API under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// A unique email for a throwaway account.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@feastflow.test", Uuid::new_v4().simple())
}

/// Errors surfaced by the test client helpers.
#[derive(Debug)]
pub enum TestError {
    Http(reqwest::Error),
    Status { status: StatusCode, body: Value },
    MissingToken,
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(e) => write!(f, "request failed: {e}"),
            Self::Status { status, body } => write!(f, "unexpected {status}: {body}"),
            Self::MissingToken => f.write_str("response carried no token"),
        }
    }
}

impl std::error::Error for TestError {}

impl From<reqwest::Error> for TestError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

/// A registered user and the bearer token issued for them.
pub struct TestUser {
    pub email: String,
    pub password: String,
    pub token: String,
    pub client: Client,
}

impl TestUser {
    /// Register a fresh customer account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or registration is refused.
    pub async fn register() -> Result<Self, TestError> {
        let client = Client::builder().cookie_store(true).build()?;
        let email = unique_email("diner");
        let password = "correct-horse-battery".to_string();

        let resp = client
            .post(format!("{}/api/auth/register", base_url()))
            .json(&json!({
                "email": email,
                "password": password,
                "firstName": "Test",
                "lastName": "Diner",
            }))
            .send()
            .await?;

        let status = resp.status();
        let body: Value = resp.json().await?;
        if status != StatusCode::CREATED {
            return Err(TestError::Status { status, body });
        }

        let token = body["token"]
            .as_str()
            .ok_or(TestError::MissingToken)?
            .to_owned();

        Ok(Self {
            email,
            password,
            token,
            client,
        })
    }

    /// GET an API path with this user's bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Result<Response, TestError> {
        Ok(self
            .client
            .get(format!("{}{path}", base_url()))
            .bearer_auth(&self.token)
            .send()
            .await?)
    }

    /// Send a JSON body to an API path with this user's bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    pub async fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &Value,
    ) -> Result<Response, TestError> {
        Ok(self
            .client
            .request(method, format!("{}{path}", base_url()))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?)
    }

    /// DELETE an API path with this user's bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    pub async fn delete(&self, path: &str) -> Result<Response, TestError> {
        Ok(self
            .client
            .delete(format!("{}{path}", base_url()))
            .bearer_auth(&self.token)
            .send()
            .await?)
    }
}

/// Body for adding `menu_item_id` from `restaurant_id` to a cart.
#[must_use]
pub fn cart_item(menu_item_id: &str, restaurant_id: &str, price: f64, quantity: i64) -> Value {
    json!({
        "menuItemId": menu_item_id,
        "menuItemName": format!("Item {menu_item_id}"),
        "menuItemPrice": price,
        "restaurantId": restaurant_id,
        "restaurantName": format!("Restaurant {restaurant_id}"),
        "quantity": quantity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_email_is_unique() {
        assert_ne!(unique_email("a"), unique_email("a"));
        assert!(unique_email("owner").starts_with("owner-"));
    }

    #[test]
    fn test_cart_item_shape() {
        let item = cart_item("m1", "r1", 10.0, 2);
        assert_eq!(item["menuItemId"], "m1");
        assert_eq!(item["restaurantId"], "r1");
        assert_eq!(item["quantity"], 2);
    }
}
