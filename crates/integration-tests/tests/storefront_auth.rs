//! Integration tests for storefront registration and login.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (as-cli migrate storefront)
//! - The storefront running (cargo run -p autoservice-storefront)

use autoservice_integration_tests::{client, storefront_base_url, unique_email};
use reqwest::{Client, StatusCode, header};

async fn register(client: &Client, email: &str, password: &str, confirm: &str) -> reqwest::Response {
    client
        .post(format!("{}/auth/register", storefront_base_url()))
        .form(&[
            ("fullname", "Integration Test"),
            ("username", "itest"),
            ("email", email),
            ("password", password),
            ("confirm_password", confirm),
        ])
        .send()
        .await
        .expect("Failed to submit registration")
}

async fn login(client: &Client, email: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{}/auth/login", storefront_base_url()))
        .form(&[("email", email), ("passworde", password)])
        .send()
        .await
        .expect("Failed to submit login")
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_health_endpoints() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to get health");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to get readiness");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_register_then_login() {
    let client = client();
    let email = unique_email();

    let resp = register(&client, &email, "s3cret-pass", "s3cret-pass").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());

    let resp = login(&client, &email, "s3cret-pass").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("Login should set the session cookie")
        .to_str()
        .expect("Cookie should be ASCII");
    assert!(cookie.starts_with("as_session="));

    let body = client
        .get(format!("{}/", storefront_base_url()))
        .send()
        .await
        .expect("Failed to get landing page")
        .text()
        .await
        .expect("Failed to read landing page");
    assert!(body.contains("itest"));
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_duplicate_registration_rejected() {
    let client = client();
    let email = unique_email();

    register(&client, &email, "first", "first").await;
    let resp = register(&client, &email, "second", "second").await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = resp.text().await.expect("Failed to read alert page");
    assert!(body.contains("This email already exists!"));
}

#[tokio::test]
#[ignore = "Requires running storefront and database"]
async fn test_login_failures_show_alerts() {
    let client = client();
    let email = unique_email();

    let resp = login(&client, &email, "whatever").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.text().await.expect("body").contains("Email not found!"));

    register(&client, &email, "right", "right").await;
    let resp = login(&client, &email, "wrong").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    assert!(resp.text().await.expect("body").contains("Incorrect password!"));
}
