//! Database operations for storefront `PostgreSQL`.
//!
//! # Database: `autoservice_storefront`
//!
//! ## Tables
//!
//! - `storefront.users` - Password login accounts (unique email)
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p autoservice-cli -- migrate storefront
//! ```

pub mod memory;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use autoservice_core::Email;

use crate::models::user::{NewUser, User};

pub use memory::MemoryUserStore;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Persistence seam for user records.
///
/// Records are created and read, never updated or deleted. Implementations
/// must reject a second record with the same email with
/// [`RepositoryError::Conflict`] and leave the first one untouched.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by exact email match, together with its password hash.
    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    /// Insert a new user in a single statement.
    async fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
