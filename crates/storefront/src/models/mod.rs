//! Domain models for storefront.
//!
//! - [`user`] - Accounts created by registration and read by login
//! - [`session`] - What a logged-in session carries

pub mod session;
pub mod user;

pub use session::{CurrentUser, keys as session_keys};
pub use user::{NewUser, User};
