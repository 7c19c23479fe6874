//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Password login and registration against the user store

pub mod auth;
