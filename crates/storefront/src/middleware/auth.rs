//! Session identity helpers.
//!
//! A successful login stores a [`CurrentUser`] in the session; pages read it
//! back with [`OptionalAuth`].

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Extractor that optionally gets the logged-in user.
///
/// Never rejects: visitors without a session, or with a session that holds
/// no user, get `None`.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(OptionalAuth(user): OptionalAuth) -> String {
///     match user {
///         Some(u) => format!("Hello, {}!", u.username),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Start an authenticated session for `user`.
///
/// The session id is rotated first so an id issued before login can't be
/// reused afterwards.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}
