//! User repository for `PostgreSQL`.
//!
//! Queries are checked at runtime (`query_as` + `FromRow`), so the crate
//! builds without a live database or an offline query cache.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use autoservice_core::{Email, UserId};

use super::{RepositoryError, UserStore};
use crate::models::user::{NewUser, User};

/// Raw `storefront.users` row.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    full_name: String,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<(User, String), RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        let user = User {
            id: UserId::new(self.id),
            full_name: self.full_name,
            username: self.username,
            email,
            created_at: self.created_at,
        };

        Ok((user, self.password_hash))
    }
}

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_BY_EMAIL: &str = r"
    SELECT id, full_name, username, email, password_hash, created_at
    FROM storefront.users
    WHERE email = $1
";

const INSERT_USER: &str = r"
    INSERT INTO storefront.users (full_name, username, email, password_hash)
    VALUES ($1, $2, $3, $4)
    RETURNING id, full_name, username, email, password_hash, created_at
";

#[async_trait]
impl UserStore for UserRepository {
    /// Get a user and its password hash by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(SELECT_BY_EMAIL)
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    async fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(INSERT_USER)
        .bind(&new_user.full_name)
        .bind(&new_user.username)
        .bind(new_user.email.as_str())
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        let (user, _) = row.into_user()?;
        Ok(user)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIGRATION: &str = include_str!("../../migrations/20261018000001_create_users.sql");

    #[test]
    fn test_queries_target_migrated_table() {
        assert!(MIGRATION.contains("CREATE TABLE storefront.users ("));
        assert!(SELECT_BY_EMAIL.contains("FROM storefront.users"));
        assert!(INSERT_USER.contains("INTO storefront.users "));

        for column in ["full_name", "username", "email", "password_hash", "created_at"] {
            assert!(MIGRATION.contains(column), "migration lacks {column}");
        }
    }
}
