//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Landing page
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (user store reachable)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//!
//! # Assistant API (JSON)
//! POST /api/assistant/ask      - Answer a question
//! GET  /api/assistant/greeting - Widget texts for a language
//! GET  /api/assistant/facts    - Store fact sheet
//! ```

pub mod assistant;
pub mod auth;
pub mod home;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
}

/// Create the assistant API routes router.
pub fn assistant_api_routes() -> Router<AppState> {
    Router::new()
        .route("/ask", post(assistant::ask))
        .route("/greeting", get(assistant::greeting))
        .route("/facts", get(assistant::facts))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/auth", auth_routes())
        .nest("/api/assistant", assistant_api_routes())
}

/// Routes with state attached, ready for the session and tracing layers.
pub fn router(state: AppState) -> Router {
    routes().with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the user store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.users().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::{Router, response::Response};
    use secrecy::SecretString;
    use tower_sessions::MemoryStore;

    use crate::assistant::{Assistant, FactSheet};
    use crate::config::{AssistantConfig, StorefrontConfig};
    use crate::db::MemoryUserStore;
    use crate::middleware::create_session_layer;
    use crate::state::AppState;

    pub fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/unused"),
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            landing_path: "/".to_string(),
            assistant: AssistantConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// App over an in-memory user store and session store, local assistant.
    pub fn test_app() -> (Router, Arc<MemoryUserStore>) {
        test_app_with(Assistant::new(FactSheet::default()))
    }

    pub fn test_app_with(assistant: Assistant) -> (Router, Arc<MemoryUserStore>) {
        let users = Arc::new(MemoryUserStore::new());
        let state = AppState::new(test_config(), users.clone(), assistant);
        let app = super::router(state)
            .layer(create_session_layer(MemoryStore::default(), false));
        (app, users)
    }

    pub async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use super::test_support::{body_string, test_app};
    use super::*;

    #[tokio::test]
    async fn test_health_and_readiness() {
        let (app, _) = test_app();

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_string(response).await, "ok");

        let response = app
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
