//! In-memory user store.
//!
//! Backs the route and service tests, and local runs without `PostgreSQL`.
//! Holds the same uniqueness rule as the `users_email_key` index.

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use autoservice_core::{Email, UserId};

use super::{RepositoryError, UserStore};
use crate::models::user::{NewUser, User};

/// User store kept in process memory.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<(User, String)>>,
    next_id: AtomicI32,
}

impl MemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the store has no users.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|(user, _)| &user.email == email).cloned())
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
        // Check and insert under one write lock, like a single INSERT.
        let mut users = self.users.write().await;
        if users.iter().any(|(user, _)| user.email == new_user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let user = User {
            id: UserId::new(id),
            full_name: new_user.full_name.clone(),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            created_at: Utc::now(),
        };
        users.push((user.clone(), new_user.password_hash.clone()));

        Ok(user)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_user(email: &str, username: &str) -> NewUser {
        NewUser {
            full_name: "Loay B".to_owned(),
            username: username.to_owned(),
            email: Email::parse(email).unwrap(),
            password_hash: "hash".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = MemoryUserStore::new();
        let first = store.create(&new_user("a@b.c", "a")).await.unwrap();
        let second = store.create(&new_user("d@e.f", "d")).await.unwrap();

        assert_eq!(first.id.as_i32(), 1);
        assert_eq!(second.id.as_i32(), 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts_and_keeps_original() {
        let store = MemoryUserStore::new();
        store.create(&new_user("a@b.c", "first")).await.unwrap();

        let err = store.create(&new_user("a@b.c", "second")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let email = Email::parse("a@b.c").unwrap();
        let (kept, _) = store.get_password_hash(&email).await.unwrap().unwrap();
        assert_eq!(kept.username, "first");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_lookup_is_exact() {
        let store = MemoryUserStore::new();
        store.create(&new_user("a@b.c", "a")).await.unwrap();

        let other_case = Email::parse("A@b.c").unwrap();
        assert!(store.get_password_hash(&other_case).await.unwrap().is_none());
    }
}
