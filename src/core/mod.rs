//! Core types shared by the engine and the command-line front end
//!
//! # Modules
//!
//! ## `error` - Error Handling
//!
//! - [`ExpandError`] - fatal failures of an expansion call and CLI failures
//! - [`ErrorContext`] - user-friendly wrapper with details and suggestions
//! - [`user_friendly_error`] - convert any [`anyhow::Error`] for CLI display

pub mod error;

pub use error::{ErrorContext, ExpandError, user_friendly_error};
