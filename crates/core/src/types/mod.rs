//! Core types for AutoService.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod language;
pub mod theme;

pub use email::{Email, EmailError};
pub use id::UserId;
pub use language::{Language, TextDirection, UnknownLanguage};
pub use theme::Theme;
