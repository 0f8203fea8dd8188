//! CLI integration tests for `expand`
//!
//! Each test runs the compiled binary against an isolated home directory.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **render**: expansion of inline, file and stdin templates with typed parameters
//! - **tokens**: token listing
//! - **config**: configuration discovery, named templates and default zones
//! - **errors**: exit status and error reports

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod config;
mod errors;
mod render;
mod tokens;
