//! Authentication service.
//!
//! Password login and registration against a [`UserStore`]. Passwords are
//! hashed with Argon2id; verification uses the `argon2` crate's constant-time
//! comparison. There is no rate limiting or lockout.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::{info, instrument};

use autoservice_core::Email;

use crate::db::{RepositoryError, UserStore};
use crate::models::user::{NewUser, User};

/// Registration form input, as submitted.
#[derive(Debug, Clone)]
pub struct Registration<'a> {
    pub full_name: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn UserStore) -> Self {
        Self { users }
    }

    /// Register a new user.
    ///
    /// The confirmation is compared before anything is hashed or stored, and
    /// only the hash of the password is persisted.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordMismatch` if password and confirmation differ.
    /// Returns `AuthError::MissingField` if a field is blank.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip_all, fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration<'_>) -> Result<User, AuthError> {
        if registration.password != registration.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        let full_name = required("fullname", registration.full_name)?;
        let username = required("username", registration.username)?;
        if registration.password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let email = Email::parse(registration.email)?;
        let password_hash = hash_password(registration.password)?;

        let user = self
            .users
            .create(&NewUser {
                full_name: full_name.to_owned(),
                username: username.to_owned(),
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// An email that cannot be parsed can't be on file, so it is reported as
    /// not found.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no user has this email.
    /// Returns `AuthError::IncorrectPassword` if the password doesn't verify.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::UserNotFound);
        };

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

/// Trim a required field, rejecting blanks.
fn required<'v>(field: &'static str, value: &'v str) -> Result<&'v str, AuthError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AuthError::MissingField(field));
    }
    Ok(trimmed)
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
///
/// A hash that does not parse is treated as a mismatch.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::IncorrectPassword)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::IncorrectPassword)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryUserStore;

    fn registration<'a>(email: &'a str, password: &'a str, confirm: &'a str) -> Registration<'a> {
        Registration {
            full_name: "Loay Benali",
            username: "loay",
            email,
            password,
            confirm_password: confirm,
        }
    }

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("brake-pads-40").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("brake-pads-40", &hash).is_ok());
        assert!(matches!(
            verify_password("brake-pads-41", &hash),
            Err(AuthError::IncorrectPassword)
        ));
    }

    #[test]
    fn test_unparsable_hash_is_mismatch() {
        assert!(matches!(
            verify_password("anything", "plaintext-from-an-old-schema"),
            Err(AuthError::IncorrectPassword)
        ));
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let store = MemoryUserStore::new();
        let auth = AuthService::new(&store);

        let user = auth
            .register(&registration("loay@autoservice.ma", "s3cret", "s3cret"))
            .await
            .unwrap();
        assert_eq!(user.username, "loay");

        let logged_in = auth.login("loay@autoservice.ma", "s3cret").await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let store = MemoryUserStore::new();
        let auth = AuthService::new(&store);
        auth.register(&registration("loay@autoservice.ma", "s3cret", "s3cret"))
            .await
            .unwrap();

        let email = Email::parse("loay@autoservice.ma").unwrap();
        let (_, hash) = store.get_password_hash(&email).await.unwrap().unwrap();
        assert_ne!(hash, "s3cret");
        assert!(verify_password("s3cret", &hash).is_ok());
    }

    #[tokio::test]
    async fn test_mismatched_confirmation_persists_nothing() {
        let store = MemoryUserStore::new();
        let auth = AuthService::new(&store);

        let err = auth
            .register(&registration("loay@autoservice.ma", "s3cret", "s3cre7"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::PasswordMismatch));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_mismatch_is_checked_before_email() {
        let store = MemoryUserStore::new();
        let auth = AuthService::new(&store);

        let err = auth
            .register(&registration("not-an-email", "a", "b"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::PasswordMismatch));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let store = MemoryUserStore::new();
        let auth = AuthService::new(&store);
        let original = auth
            .register(&registration("loay@autoservice.ma", "first", "first"))
            .await
            .unwrap();

        let err = auth
            .register(&Registration {
                username: "impostor",
                ..registration("loay@autoservice.ma", "second", "second")
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));

        // Original record and password are unchanged.
        let kept = auth.login("loay@autoservice.ma", "first").await.unwrap();
        assert_eq!(kept, original);
        assert!(matches!(
            auth.login("loay@autoservice.ma", "second").await,
            Err(AuthError::IncorrectPassword)
        ));
    }

    #[tokio::test]
    async fn test_blank_fields_rejected() {
        let store = MemoryUserStore::new();
        let auth = AuthService::new(&store);

        let err = auth
            .register(&Registration {
                username: "   ",
                ..registration("loay@autoservice.ma", "pw", "pw")
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingField("username")));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let store = MemoryUserStore::new();
        let auth = AuthService::new(&store);

        assert!(matches!(
            auth.login("nobody@autoservice.ma", "pw").await,
            Err(AuthError::UserNotFound)
        ));
        assert!(matches!(
            auth.login("garbage", "pw").await,
            Err(AuthError::UserNotFound)
        ));
    }
}
