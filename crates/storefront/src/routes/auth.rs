//! Authentication route handlers.
//!
//! Email/password login and account registration against the storefront's
//! own user table. Successes redirect to the configured landing path;
//! failures come back as an alert page (see [`AppError`]).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument};

use crate::error::{AppError, set_sentry_user};
use crate::middleware::set_current_user;
use crate::models::CurrentUser;
use crate::services::auth::{AuthService, Registration};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data. Missing fields are treated as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    /// Field name used by the login page's password input.
    pub passworde: String,
}

/// Registration form data. Missing fields are treated as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate;

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate;

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page() -> impl IntoResponse {
    LoginTemplate
}

/// Handle login form submission.
///
/// On success the user is stored in a fresh session and redirected to the
/// landing path. Nothing is written to the session on failure.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    let user = AuthService::new(state.users())
        .login(&form.email, &form.passworde)
        .await
        .inspect_err(|e| info!(reason = %e, "Login rejected"))?;

    set_current_user(&session, &CurrentUser::from(&user)).await?;
    set_sentry_user(&user.id, &user.username);
    info!(user_id = %user.id, "User logged in");

    Ok(Redirect::to(&state.config().landing_path))
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page() -> impl IntoResponse {
    RegisterTemplate
}

/// Handle registration form submission.
///
/// Creates the account and redirects to the landing path without logging
/// the new user in.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, AppError> {
    AuthService::new(state.users())
        .register(&Registration {
            full_name: &form.fullname,
            username: &form.username,
            email: &form.email,
            password: &form.password,
            confirm_password: &form.confirm_password,
        })
        .await
        .inspect_err(|e| info!(reason = %e, "Registration rejected"))?;

    Ok(Redirect::to(&state.config().landing_path))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use crate::routes::test_support::{body_string, test_app};

    fn form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    async fn register(app: &Router, email: &str, password: &str) -> axum::response::Response {
        let body = format!(
            "fullname=Loay+Benali&username=loay&email={email}&password={password}&confirm_password={password}"
        );
        app.clone()
            .oneshot(form("/auth/register", &body))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_pages_render_forms() {
        let (app, _) = test_app();

        let response = app
            .clone()
            .oneshot(Request::get("/auth/login").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains(r#"name="passworde""#));

        let response = app
            .oneshot(Request::get("/auth/register").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_string(response).await;
        assert!(html.contains(r#"name="confirm_password""#));
    }

    #[tokio::test]
    async fn test_register_redirects_without_session() {
        let (app, users) = test_app();

        let response = register(&app, "loay%40autoservice.ma", "s3cret").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(users.len().await, 1);
    }

    #[tokio::test]
    async fn test_register_mismatch_shows_alert() {
        let (app, users) = test_app();

        let response = app
            .oneshot(form(
                "/auth/register",
                "fullname=L&username=l&email=l%40a.ma&password=one&confirm_password=two",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = body_string(response).await;
        assert!(html.contains(r#"alert("Passwords do not match!")"#));
        assert!(html.contains("history.back()"));
        assert!(users.is_empty().await);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let (app, users) = test_app();
        register(&app, "loay%40autoservice.ma", "first").await;

        let response = register(&app, "loay%40autoservice.ma", "second").await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(body_string(response).await.contains("This email already exists!"));
        assert_eq!(users.len().await, 1);
    }

    #[tokio::test]
    async fn test_login_starts_session() {
        let (app, _) = test_app();
        register(&app, "loay%40autoservice.ma", "s3cret").await;

        let response = app
            .clone()
            .oneshot(form(
                "/auth/login",
                "email=loay%40autoservice.ma&passworde=s3cret",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");

        let cookie = response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_owned();
        assert!(cookie.starts_with("as_session="));

        // The landing page sees the logged-in user.
        let response = app
            .oneshot(
                Request::get("/")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(body_string(response).await.contains("loay"));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let (app, _) = test_app();

        let response = app
            .oneshot(form("/auth/login", "email=ghost%40autoservice.ma&passworde=x"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert!(body_string(response).await.contains("Email not found!"));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (app, _) = test_app();
        register(&app, "loay%40autoservice.ma", "s3cret").await;

        let response = app
            .oneshot(form(
                "/auth/login",
                "email=loay%40autoservice.ma&passworde=wrong",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert!(body_string(response).await.contains("Incorrect password!"));
    }

    #[tokio::test]
    async fn test_login_with_missing_fields_is_not_found() {
        let (app, _) = test_app();

        let response = app.oneshot(form("/auth/login", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
