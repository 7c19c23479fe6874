//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction per route)
//! 2. `TraceLayer` (`http_request` span)
//! 3. Request ID (recorded on the span)
//! 4. Session layer (tower-sessions, `PostgreSQL` store)

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{OptionalAuth, set_current_user};
pub use request_id::request_id_middleware;
pub use session::{create_session_layer, postgres_store};
