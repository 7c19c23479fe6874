//! Client for the remote text-generation service.
//!
//! The service receives `{model, prompt, max_tokens, lang}` as JSON and
//! answers `{text}`. Anything else (non-2xx, malformed body, empty text,
//! transport error, timeout) is an error; callers fall back to the local
//! responder and never retry.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use autoservice_core::Language;

/// How long to wait for the generation service before giving up.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the generation service.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status.
    #[error("generation service returned {status}")]
    Status { status: reqwest::StatusCode },

    /// Body was not the expected JSON shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Body parsed but carried no text.
    #[error("response has no text")]
    EmptyText,
}

/// Request body sent to the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub lang: Language,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    text: Option<String>,
}

/// Something that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` if no usable text was produced.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// HTTP client for a `{text}`-returning generation endpoint.
#[derive(Clone)]
pub struct GenerationClient {
    inner: Arc<GenerationClientInner>,
}

struct GenerationClientInner {
    client: reqwest::Client,
    endpoint: Url,
}

impl GenerationClient {
    /// Create a client for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Http` if the HTTP client cannot be built.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, GenerationError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(GenerationClientInner { client, endpoint }),
        })
    }
}

#[async_trait]
impl TextGenerator for GenerationClient {
    #[instrument(skip(self, request), fields(model = %request.model, lang = %request.lang))]
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status { status });
        }

        let body = response.text().await?;
        let parsed: GenerationResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::Parse(format!("Failed to parse response: {e}")))?;

        match parsed.text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(GenerationError::EmptyText),
        }
    }
}
