//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_LANDING_PATH` - Local path login and registration redirect to (default: /)
//! - `ASSISTANT_API_ENDPOINT` - Text-generation proxy URL; unset means local answers only
//! - `ASSISTANT_MODEL` - Model hint sent to the proxy (default: gpt-4o-mini)
//! - `ASSISTANT_MAX_TOKENS` - Output size hint sent to the proxy (default: 600)
//! - `ASSISTANT_THINKING_DELAY_MS` - Cosmetic delay before local answers in the widget (default: 600)
//! - `ASSISTANT_FACTS_PATH` - YAML fact sheet; unset means the built-in one
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_ASSISTANT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_ASSISTANT_MAX_TOKENS: u32 = 600;
const DEFAULT_THINKING_DELAY_MS: u64 = 600;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Redirect target after a successful login or registration
    pub landing_path: String,
    /// Store assistant configuration
    pub assistant: AssistantConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "production")
    pub sentry_environment: Option<String>,
}

/// Store assistant configuration.
///
/// Loaded separately by the CLI's terminal chat, which has no database.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Text-generation proxy endpoint. `None` means rule-based answers only.
    pub endpoint: Option<Url>,
    /// Model hint forwarded to the proxy
    pub model: String,
    /// Output size hint forwarded to the proxy
    pub max_tokens: u32,
    /// Cosmetic "thinking" delay before a local answer is shown in the widget
    pub thinking_delay: Duration,
    /// YAML fact sheet overriding the built-in one
    pub facts_path: Option<PathBuf>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: DEFAULT_ASSISTANT_MODEL.to_owned(),
            max_tokens: DEFAULT_ASSISTANT_MAX_TOKENS,
            thinking_delay: Duration::from_millis(DEFAULT_THINKING_DELAY_MS),
            facts_path: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// or if the landing path is not a local path.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFRONT_DATABASE_URL")?;
        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;
        let landing_path = parse_landing_path(&get_env_or_default("STOREFRONT_LANDING_PATH", "/"))?;

        let assistant = AssistantConfig::from_env()?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            landing_path,
            assistant,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the site is served over HTTPS (controls the secure cookie flag).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl AssistantConfig {
    /// Load assistant settings from environment variables.
    ///
    /// Does not load `.env`; callers decide whether to.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the endpoint is not an http(s)
    /// URL or a numeric setting does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = get_optional_env("ASSISTANT_API_ENDPOINT")
            .filter(|value| !value.trim().is_empty())
            .map(|value| parse_endpoint(&value))
            .transpose()?;

        let max_tokens = get_env_or_default(
            "ASSISTANT_MAX_TOKENS",
            &DEFAULT_ASSISTANT_MAX_TOKENS.to_string(),
        )
        .parse::<u32>()
        .map_err(|e| ConfigError::InvalidEnvVar("ASSISTANT_MAX_TOKENS".to_string(), e.to_string()))?;

        let delay_ms = get_env_or_default(
            "ASSISTANT_THINKING_DELAY_MS",
            &DEFAULT_THINKING_DELAY_MS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("ASSISTANT_THINKING_DELAY_MS".to_string(), e.to_string())
        })?;

        Ok(Self {
            endpoint,
            model: get_env_or_default("ASSISTANT_MODEL", DEFAULT_ASSISTANT_MODEL),
            max_tokens,
            thinking_delay: Duration::from_millis(delay_ms),
            facts_path: get_optional_env("ASSISTANT_FACTS_PATH").map(PathBuf::from),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse the generation endpoint, accepting only http(s) URLs.
fn parse_endpoint(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|e| {
        ConfigError::InvalidEnvVar("ASSISTANT_API_ENDPOINT".to_string(), e.to_string())
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnvVar(
            "ASSISTANT_API_ENDPOINT".to_string(),
            format!("unsupported scheme '{other}'"),
        )),
    }
}

/// Landing path must stay on this site: a single leading slash, no scheme.
fn parse_landing_path(value: &str) -> Result<String, ConfigError> {
    let path = value.trim();
    // Browsers read `\` as `/` and drop tabs and newlines, so `/\host` and
    // `/\t/host` would leave the site too.
    if !path.starts_with('/')
        || path.starts_with("//")
        || path.contains("://")
        || path.contains('\\')
        || path.chars().any(char::is_control)
    {
        return Err(ConfigError::InvalidEnvVar(
            "STOREFRONT_LANDING_PATH".to_string(),
            format!("'{path}' is not a local path"),
        ));
    }
    Ok(path.to_string())
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_landing_path() {
        assert_eq!(parse_landing_path(" /account ").unwrap(), "/account");
        assert!(parse_landing_path("").is_err());
        assert!(parse_landing_path("//evil.example").is_err());
        assert!(parse_landing_path("https://evil.example/").is_err());
        assert!(parse_landing_path("/\\evil.example").is_err());
        assert!(parse_landing_path("/account\\..\\x").is_err());
        assert!(parse_landing_path("/\t/evil.example").is_err());
    }

    #[test]
    fn test_parse_endpoint_accepts_http() {
        let url = parse_endpoint(" https://proxy.autoservice.ma/api/ai ").unwrap();
        assert_eq!(url.path(), "/api/ai");
    }

    #[test]
    fn test_parse_endpoint_rejects_other_schemes() {
        assert!(matches!(
            parse_endpoint("ftp://proxy.autoservice.ma/ai"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(parse_endpoint("/api/ai").is_err());
    }

    #[test]
    fn test_assistant_defaults() {
        let config = AssistantConfig::default();
        assert!(config.endpoint.is_none());
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 600);
        assert_eq!(config.thinking_delay, Duration::from_millis(600));
    }

    #[test]
    fn test_socket_addr_and_secure_flag() {
        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "https://autoservice.ma".to_string(),
            landing_path: "/".to_string(),
            assistant: AssistantConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
        assert!(config.is_secure());
    }
}
