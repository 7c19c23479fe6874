//! Integration tests for the store assistant API.
//!
//! These tests require the storefront running (cargo run -p autoservice-storefront).
//! With `ASSISTANT_API_ENDPOINT` unset every answer is local.

use autoservice_integration_tests::{client, storefront_base_url};
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn ask(body: &Value) -> reqwest::Response {
    client()
        .post(format!("{}/api/assistant/ask", storefront_base_url()))
        .json(body)
        .send()
        .await
        .expect("Failed to post question")
}

#[tokio::test]
#[ignore = "Requires running storefront"]
async fn test_ask_returns_localized_answer() {
    let resp = ask(&json!({ "message": "What are your hours?", "lang": "ar" })).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse answer");
    assert_eq!(body["lang"], "ar");
    assert_eq!(body["direction"], "rtl");
    assert!(!body["text"].as_str().expect("text").is_empty());
    assert!(body["html"].as_str().expect("html").contains(r#"dir="rtl""#));
}

#[tokio::test]
#[ignore = "Requires running storefront"]
async fn test_ask_rejects_blank_message() {
    let resp = ask(&json!({ "message": "  " })).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront"]
async fn test_greeting_and_facts() {
    let client = client();
    let base_url = storefront_base_url();

    let greeting: Value = client
        .get(format!("{base_url}/api/assistant/greeting?lang=fr"))
        .send()
        .await
        .expect("Failed to get greeting")
        .json()
        .await
        .expect("Failed to parse greeting");
    assert_eq!(greeting["lang"], "fr");
    assert_eq!(greeting["direction"], "ltr");

    let facts: Value = client
        .get(format!("{base_url}/api/assistant/facts"))
        .send()
        .await
        .expect("Failed to get facts")
        .json()
        .await
        .expect("Failed to parse facts");
    assert!(facts["owner"]["phone"].is_string());
    assert!(facts["prices"].is_array());
}
