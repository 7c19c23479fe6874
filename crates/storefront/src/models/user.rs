//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use autoservice_core::{Email, UserId};

/// A storefront user (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Full name as entered at registration.
    pub full_name: String,
    /// Display name shown once logged in.
    pub username: String,
    /// Login email (unique).
    pub email: Email,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

/// A user about to be inserted.
///
/// Carries the password hash only; the plaintext and its confirmation never
/// reach the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub username: String,
    pub email: Email,
    pub password_hash: String,
}
