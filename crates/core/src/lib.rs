//! AutoService Core - Shared types library.
//!
//! This crate provides common types used across all AutoService components:
//! - `storefront` - Public site: login/registration and the store assistant
//! - `cli` - Command-line tools for migrations, fact sheets and the terminal assistant
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs and emails, plus the assistant's
//!   language and theme settings

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
