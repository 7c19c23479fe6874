//! Application state shared across handlers.

use std::sync::Arc;

use crate::assistant::Assistant;
use crate::config::StorefrontConfig;
use crate::db::UserStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the user store, the assistant, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    users: Arc<dyn UserStore>,
    assistant: Assistant,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, users: Arc<dyn UserStore>, assistant: Assistant) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                users,
                assistant,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the user store.
    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }

    /// Get the store assistant.
    #[must_use]
    pub fn assistant(&self) -> &Assistant {
        &self.inner.assistant
    }
}
