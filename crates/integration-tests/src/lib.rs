//! Integration tests for Customer Desk.
//!
//! # Running Tests
//!
//! ```bash
//! # Apply migrations and start the server
//! cargo run -p customer-desk-cli -- migrate
//! cargo run -p customer-desk-server
//!
//! # Run the ignored tests against it
//! cargo test -p customer-desk-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `DESK_BASE_URL` - server under test (default `http://localhost:3000`)
//! - `DATABASE_URL` - same database as the server, for direct fixture setup

use reqwest::{Client, Response};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("DESK_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A customer `id` that no other test run will collide with.
#[must_use]
pub fn unique_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// HTTP client plus base URL for one test.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: base_url(),
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Create a customer through the API and return its JSON.
    ///
    /// # Panics
    ///
    /// Panics if the server is unreachable or does not answer 201.
    #[allow(clippy::unwrap_used)]
    pub async fn create_customer(&self, body: &Value) -> Value {
        let resp = self
            .client
            .post(self.url("/api/customers"))
            .json(body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
        resp.json().await.unwrap()
    }

    /// Delete a customer by row, ignoring the outcome.
    pub async fn delete_customer(&self, row: &Value) -> Option<Response> {
        self.client
            .delete(self.url(&format!("/api/customers/{row}")))
            .send()
            .await
            .ok()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Connect to the server's database for fixtures the API cannot create.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset or the connection fails.
pub async fn database() -> Result<PgPool, Box<dyn std::error::Error>> {
    let url = std::env::var("DATABASE_URL")?;
    Ok(PgPool::connect(&url).await?)
}
