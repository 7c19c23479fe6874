//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during login and registration.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No user has the submitted email.
    #[error("email not found")]
    UserNotFound,

    /// The password does not match the stored hash.
    #[error("incorrect password")]
    IncorrectPassword,

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// A required registration field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Invalid email format at registration.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] autoservice_core::EmailError),

    /// The email is already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
