//! Error handling for the expander
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** ([`ExpandError`]) for every failure that aborts an
//!    expansion call or a CLI invocation
//! 2. **User-friendly messages** ([`ErrorContext`]) with details and suggestions for
//!    CLI users
//!
//! # What is *not* an error
//!
//! The engine degrades silently in two places and never reports them:
//! - token text that does not match the option grammar is emitted verbatim
//! - references beyond the supplied parameters resolve to `""` or `0`
//!
//! Invalid base64 input to `b64decode` is also a soft fallback: the operator returns
//! its input unchanged. Malformed percent-encoding, on the other hand, is fatal. The
//! asymmetry is deliberate and covered by tests.
//!
//! # Examples
//!
//! ```rust,no_run
//! use expander::core::{ExpandError, user_friendly_error};
//!
//! let err = expander::expand("{%d}", &expander::params!["abc"]).unwrap_err();
//! assert!(matches!(err, ExpandError::FormatMismatch { .. }));
//!
//! let ctx = user_friendly_error(anyhow::Error::from(err));
//! ctx.display(); // colored error with a suggestion
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for expansion and CLI operations
///
/// Engine variants are raised while evaluating a replacement token and abort the
/// whole `expand` call. The remaining variants belong to the command-line front end.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    /// A literal or parameter used where an integer is required does not parse
    #[error("Invalid integer '{value}'")]
    InvalidInteger {
        /// The offending text
        value: String,
    },

    /// A printf conversion was applied to a value of the wrong type
    #[error("Format specifier '{spec}' cannot be applied to a {value_type} value")]
    FormatMismatch {
        /// The full format specifier
        spec: String,
        /// Type name of the working value
        value_type: &'static str,
    },

    /// A printf specifier is structurally invalid
    #[error("Invalid format specifier '{spec}': {reason}")]
    InvalidFormat {
        /// The full format specifier
        spec: String,
        /// What is wrong with it
        reason: String,
    },

    /// A time-zone identifier could not be resolved
    #[error("Unknown time zone '{zone}'")]
    UnknownTimeZone {
        /// The identifier as written
        zone: String,
    },

    /// A date pattern contains a reserved or unknown field
    #[error("Invalid date pattern '{pattern}': {reason}")]
    InvalidDatePattern {
        /// The date pattern after unescaping
        pattern: String,
        /// What is wrong with it
        reason: String,
    },

    /// A regular expression failed to compile or exceeded its backtracking limit
    #[error("Invalid regular expression '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern text
        pattern: String,
        /// Engine message
        reason: String,
    },

    /// `urldecode` met a `%` that is not followed by two hex digits
    #[error("Malformed percent-encoding in '{input}': {reason}")]
    MalformedUrlEncoding {
        /// The text being decoded
        input: String,
        /// What is wrong with it
        reason: String,
    },

    /// Configuration file could not be used
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// A named template is missing from the configuration
    #[error("Template '{name}' not found in configuration")]
    TemplateNotFound {
        /// The requested template name
        name: String,
    },

    /// A command-line parameter could not be converted to a value
    #[error("Invalid parameter '{value}': {reason}")]
    InvalidParameter {
        /// The parameter as given
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Error wrapper carrying user-facing details and suggestions
///
/// # Examples
///
/// ```rust,no_run
/// use expander::core::{ErrorContext, ExpandError};
///
/// let context = ErrorContext::new(ExpandError::UnknownTimeZone { zone: "Mars".into() })
///     .with_suggestion("Use UTC, GMT or an offset such as +05:30")
///     .with_details("Zone names are case-sensitive");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: ExpandError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: ExpandError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`]
///
/// Recognizes [`ExpandError`], [`std::io::Error`], [`toml::de::Error`] and
/// [`serde_json::Error`] anywhere in the chain; everything else is reported with its
/// full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(expand_error) = cause.downcast_ref::<ExpandError>() {
            return create_error_context(expand_error.clone());
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(ExpandError::Other {
                    message: format_chain(&error),
                })
                .with_suggestion("Check that the template file exists and the path is correct");
            }
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(ExpandError::Other {
                    message: format_chain(&error),
                })
                .with_suggestion("Check the file permissions");
            }
            _ => {}
        }
    }

    if error.chain().any(|cause| cause.downcast_ref::<toml::de::Error>().is_some()) {
        return ErrorContext::new(ExpandError::ConfigError {
            message: format_chain(&error),
        })
        .with_suggestion("Check the TOML syntax of your configuration file")
        .with_details("The configuration accepts `default_zone` and a `[templates]` table");
    }

    if error.chain().any(|cause| cause.downcast_ref::<serde_json::Error>().is_some()) {
        return ErrorContext::new(ExpandError::InvalidParameter {
            value: "--json".to_string(),
            reason: format_chain(&error),
        })
        .with_suggestion(r#"Pass a JSON array such as '["text", 4, 2.5, null]'"#);
    }

    ErrorContext::new(ExpandError::Other {
        message: format_chain(&error),
    })
}

fn format_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();

    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    message
}

/// Map each [`ExpandError`] variant to tailored suggestions
fn create_error_context(error: ExpandError) -> ErrorContext {
    match &error {
        ExpandError::InvalidInteger {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Substring bounds must be integers; check the parameter supplied for `{}`")
            .with_details("Empty text counts as 0, floats are truncated, other text must parse"),
        ExpandError::FormatMismatch {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Pass a typed parameter (int:, float:) or use %s for text")
            .with_details("Numeric conversions only accept parameters of the matching type"),
        ExpandError::InvalidFormat {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Flags '-' and '0' need a width; integer conversions take no precision"),
        ExpandError::UnknownTimeZone {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Use a tz database name such as Europe/Paris or UTC, or a fixed offset such as +05:30")
            .with_details("Zone identifiers are case-sensitive"),
        ExpandError::InvalidDatePattern {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Quote literal text in date patterns with single quotes, e.g. 'at'"),
        ExpandError::InvalidPattern {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the regular expression for unbalanced groups or brackets"),
        ExpandError::MalformedUrlEncoding {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Every '%' must be followed by two hexadecimal digits"),
        ExpandError::ConfigError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the configuration file or pass --config with a valid path"),
        ExpandError::TemplateNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Add the template under [templates] in your configuration file"),
        ExpandError::InvalidParameter {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Use str:, int:, float:, instant:, millis: or null: prefixes"),
        ExpandError::Other {
            ..
        } => ErrorContext::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ExpandError::UnknownTimeZone {
            zone: "Mars".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown time zone 'Mars'");

        let error = ExpandError::FormatMismatch {
            spec: "%d".to_string(),
            value_type: "text",
        };
        assert_eq!(error.to_string(), "Format specifier '%d' cannot be applied to a text value");
    }

    #[test]
    fn test_error_context_display() {
        let context = ErrorContext::new(ExpandError::TemplateNotFound {
            name: "greeting".to_string(),
        })
        .with_details("details here")
        .with_suggestion("try this");

        let rendered = context.to_string();
        assert!(rendered.contains("Template 'greeting' not found"));
        assert!(rendered.contains("Details: details here"));
        assert!(rendered.contains("Suggestion: try this"));
    }

    #[test]
    fn test_user_friendly_error_downcasts_through_context() {
        let error = anyhow::Error::from(ExpandError::InvalidInteger {
            value: "abc".to_string(),
        })
        .context("Failed to expand template");

        let context = user_friendly_error(error);
        assert!(matches!(context.error, ExpandError::InvalidInteger { .. }));
        assert!(context.suggestion.is_some());
    }

    #[test]
    fn test_user_friendly_error_generic() {
        let context = user_friendly_error(anyhow::anyhow!("Something went wrong"));
        assert!(matches!(context.error, ExpandError::Other { .. }));
        assert_eq!(context.error.to_string(), "Something went wrong");
    }
}
