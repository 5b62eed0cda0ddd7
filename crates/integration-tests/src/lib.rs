//! Integration tests for the Souk storefront.
//!
//! The tests in `tests/` talk to a running storefront over HTTP and are
//! `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the storefront against a backend
//! cargo run -p souk-storefront
//!
//! # Run the ignored tests
//! STOREFRONT_BASE_URL=http://localhost:3000 cargo test -p souk-integration-tests -- --ignored
//! ```
//!
//! Tests that need an account read `SOUK_TEST_EMAIL` and `SOUK_TEST_PASSWORD`
//! and skip themselves when those are unset.

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Base URL of the storefront under test.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Credentials of a test account, when configured.
#[must_use]
pub fn test_credentials() -> Option<(String, String)> {
    let email = std::env::var("SOUK_TEST_EMAIL").ok()?;
    let password = std::env::var("SOUK_TEST_PASSWORD").ok()?;
    Some((email, password))
}

/// The storefront's JSON envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Read an envelope from a response body.
    ///
    /// # Errors
    ///
    /// Returns the reqwest error if the body is not an envelope.
    pub async fn from_response(response: reqwest::Response) -> reqwest::Result<Self> {
        response.json().await
    }
}
