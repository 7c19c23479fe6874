//! Integration tests for AutoService BL.
//!
//! These run against a live storefront and are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! cargo run -p autoservice-cli -- migrate storefront
//! cargo run -p autoservice-storefront &
//! cargo test -p autoservice-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` - Server under test (default: `http://localhost:3000`)

use reqwest::{Client, redirect};

/// Base URL of the storefront under test.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Client that keeps cookies and does not follow redirects, so tests can
/// assert on the login and registration redirects themselves.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// An email address no other test run has used.
#[must_use]
pub fn unique_email() -> String {
    format!("it-{}@autoservice.test", uuid::Uuid::new_v4().simple())
}
