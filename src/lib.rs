//! expander - positional text-template expansion
//!
//! Templates are plain text with embedded `{...}` tokens. Each token takes a
//! parameter (the next one, a numbered one, or the current instant) and passes it
//! through a chain of operators: trimming and case changes, URL and base64
//! codecs, character substrings, regex extraction, printf-style formatting and
//! date formatting. Conditional blocks drop text that no replacement filled in.
//!
//! # Core Modules
//!
//! - [`expander`] - scanner, option grammar, operators and the expansion driver
//! - [`format`] - printf conversions, date patterns, time zones and codecs
//! - [`core`] - error types and user-facing error reports
//!
//! ## Command-Line Front End
//! - [`cli`] - the `expand` binary's commands
//! - [`config`] - the optional `~/.expander/config.toml`
//! - [`constants`] - shared names and defaults
//!
//! # Examples
//!
//! ```
//! use expander::{expand, params};
//!
//! assert_eq!(expand("a{}b{}c", &params!["0", "1"]).unwrap(), "a0b1c");
//! assert_eq!(expand("{[4,-2]}", &params!["hamburger"]).unwrap(), "urge");
//! assert_eq!(expand("{%05.1f}", &params![3.14159]).unwrap(), "003.1");
//! assert_eq!(expand("{[/(\\w+)@/1],upper}", &params!["joe@example.com"]).unwrap(), "JOE");
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Expand an inline template
//! expand render '{trim,urlencode}' '  a b&c '
//!
//! # Typed parameters and a pinned zone
//! expand render --zone UTC '{date(yyyy-MM-dd)}' millis:1588697522346
//!
//! # Inspect tokenization
//! expand tokens '{?}&c={}{.}'
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod expander;
pub mod format;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use crate::core::ExpandError;
pub use crate::expander::{Expander, Value, expand};
