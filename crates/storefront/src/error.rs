//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Failures of the login and registration forms are answered with a small
//! page that shows a browser alert and goes back to the form, so the visitor
//! can correct the input and retry.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::auth::AuthError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Login or registration failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session store failed while logging in.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Page that alerts `message` and returns to the previous page.
#[derive(Template, WebTemplate)]
#[template(path = "auth/alert.html")]
pub struct AlertPage {
    pub message: String,
    /// `message` as a JavaScript string literal, safe inside `<script>`.
    pub message_js: String,
}

impl AlertPage {
    #[must_use]
    pub fn new(message: &str) -> Self {
        let quoted = serde_json::to_string(message).unwrap_or_else(|_| "\"\"".to_string());
        let message_js = quoted
            .replace('<', "\\u003c")
            .replace('>', "\\u003e")
            .replace('&', "\\u0026");

        Self {
            message: message.to_string(),
            message_js,
        }
    }
}

const GENERIC_FAILURE: &str = "Something went wrong, please try again.";

impl AppError {
    /// Whether this error is our fault and should reach Sentry.
    fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Session(_) | Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash)
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::IncorrectPassword => StatusCode::UNAUTHORIZED,
                AuthError::PasswordMismatch
                | AuthError::MissingField(_)
                | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message shown to the visitor. Internal details are never exposed.
    fn public_message(&self) -> String {
        match self {
            Self::Session(_) => GENERIC_FAILURE.to_string(),
            Self::Auth(err) => match err {
                AuthError::UserNotFound => "Email not found!".to_string(),
                AuthError::IncorrectPassword => "Incorrect password!".to_string(),
                AuthError::PasswordMismatch => "Passwords do not match!".to_string(),
                AuthError::UserAlreadyExists => "This email already exists!".to_string(),
                AuthError::MissingField(field) => format!("Please fill in the {field} field."),
                AuthError::InvalidEmail(_) => "Invalid email address!".to_string(),
                AuthError::Repository(_) | AuthError::PasswordHash => GENERIC_FAILURE.to_string(),
            },
            Self::BadRequest(_) => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        let message = self.public_message();

        match self {
            Self::Auth(_) | Self::Session(_) => (status, AlertPage::new(&message)).into_response(),
            Self::BadRequest(_) => (status, message).into_response(),
        }
    }
}

/// Set the Sentry user context after a successful login.
pub fn set_sentry_user(user_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}
