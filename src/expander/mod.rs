//! Template expansion engine.
//!
//! A template is plain text with embedded tokens. Each replacement token picks a
//! starting value (by default the next parameter) and passes it through a chain of
//! operators. Conditional markers drop parts of the output that no replacement
//! filled in.
//!
//! # Syntax
//!
//! | Token        | Meaning                                                      |
//! |--------------|--------------------------------------------------------------|
//! | `{}`         | next parameter                                               |
//! | `{3}`        | third parameter, without advancing the sequence              |
//! | `{now}`      | current instant                                              |
//! | `{a,b,...}`  | starting value transformed by options `a`, `b`, ... in order |
//! | `\{...}`     | the token text itself, unevaluated                           |
//! | `\\{...}`    | a backslash followed by the evaluated token                  |
//! | `{?}`        | opens a conditional block                                    |
//! | `{.}`        | closes a conditional block                                   |
//!
//! Options (case-insensitive, commas optional):
//!
//! - `trim`, `lower`/`tolower`, `upper`/`toupper`
//! - `urlencode`, `urldecode`, `b64encode`/`base64encode`, `b64decode`/`base64decode`
//! - `[start]`, `[start,end]`, `[start:length]`: character substrings, negative
//!   `end` counting from the end
//! - `[/pattern/]`, `[/pattern/group]`: first regex match, or a numbered or named group
//! - `%...`: a printf-style conversion such as `%05d` or `%.2f`
//! - `date`, `date(pattern)`, `date(pattern)[zone]`: render an instant or epoch
//!   milliseconds; `now(...)` does the same for the current instant
//!
//! Substring bounds, regex patterns and groups, and date patterns may be written
//! as `{}` or `{n}` to read them from the parameters as well.
//!
//! # Conditional blocks
//!
//! Text from `{?}` up to `{.}` (or the next `{?}`, or the end of the template) is
//! kept only if at least one replacement inside it produced non-empty text:
//!
//! ```
//! use expander::{expand, params};
//!
//! let query = "?a=b{?}&c={}{?}&e={}";
//! assert_eq!(expand(query, &params!["", "f"]).unwrap(), "?a=b&e=f");
//! assert_eq!(expand(query, &params!["d", ""]).unwrap(), "?a=b&c=d");
//! ```
//!
//! # Errors
//!
//! Malformed tokens are copied to the output as text. Failures while evaluating
//! a well-formed token, such as a non-numeric substring bound or a printf type
//! mismatch, abort the call with an [`ExpandError`].

mod conditional;
pub mod grammar;
pub mod operator;
pub mod reference;
pub mod scanner;
pub mod value;


use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

pub use grammar::{Base, TokenSpec};
pub use operator::Operator;
pub use reference::{ArgumentCursor, Reference};
pub use scanner::{Scanner, Token};
pub use value::Value;

use crate::core::ExpandError;
use crate::format::TimeZone;
use conditional::ConditionalBlock;
use operator::Scope;
use reference::param_at;

/// Source of the current instant for `now`.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Expands templates with a fixed configuration.
///
/// An `Expander` holds no per-call state and can be shared between threads.
///
/// ```
/// use expander::{Expander, params};
/// use expander::format::TimeZone;
///
/// let expander = Expander::new().with_default_zone(TimeZone::utc());
/// let out = expander.expand("{date(yyyy-MM-dd)}", &params![86_400_000_i64]).unwrap();
/// assert_eq!(out, "1970-01-02");
/// ```
#[derive(Debug, Clone)]
pub struct Expander {
    default_zone: TimeZone,
    clock: Arc<dyn Clock>,
}

impl Default for Expander {
    fn default() -> Self {
        Self::new()
    }
}

impl Expander {
    /// An expander using the system zone and clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_zone: TimeZone::Local,
            clock: Arc::new(SystemClock),
        }
    }

    /// Zone used by date options that do not name one.
    #[must_use]
    pub fn with_default_zone(mut self, zone: TimeZone) -> Self {
        self.default_zone = zone;
        self
    }

    /// Clock read by `now`.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub const fn default_zone(&self) -> &TimeZone {
        &self.default_zone
    }

    /// Expand `template` against `params`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ExpandError`] raised while evaluating a replacement
    /// token; no partial output is returned.
    pub fn expand(&self, template: &str, params: &[Value]) -> Result<String, ExpandError> {
        debug!(template_len = template.len(), params = params.len(), "expanding template");

        let mut out = String::with_capacity(template.len());
        let mut cursor = ArgumentCursor::new();
        let mut block = ConditionalBlock::new();

        for token in Scanner::new(template) {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::ConditionalOpen => block.open(&mut out),
                Token::ConditionalClose => block.close(&mut out),
                Token::Replacement {
                    escape,
                    raw,
                    spec,
                } => {
                    let start = out.len();
                    if escape == 1 {
                        out.push('{');
                        out.push_str(raw);
                        out.push('}');
                    } else {
                        let text = self.evaluate(&spec, params, &mut cursor)?;
                        trace!(raw, escape, value = %text, "evaluated token");
                        if escape == 2 {
                            out.push('\\');
                        }
                        out.push_str(&text);
                    }
                    block.record(&out[start..]);
                }
            }
        }

        block.finish(&mut out);
        debug!(consumed = cursor.consumed(), output_len = out.len(), "expansion complete");
        Ok(out)
    }

    fn evaluate(
        &self,
        spec: &TokenSpec,
        params: &[Value],
        cursor: &mut ArgumentCursor,
    ) -> Result<String, ExpandError> {
        let position = match spec.base {
            Base::Now => None,
            Base::Next => Some(cursor.advance()),
            Base::Position(n) => Some(n),
        };
        let mut working = match position {
            None => Value::Instant(self.clock.now()),
            Some(n) => param_at(params, n).cloned().unwrap_or(Value::Null),
        };

        let mut scope = Scope {
            params,
            cursor,
            default_zone: &self.default_zone,
        };
        for op in &spec.operators {
            working = op.apply(working, &mut scope)?;
        }
        Ok(working.to_string())
    }
}

/// Expand with the default [`Expander`].
///
/// # Errors
///
/// See [`Expander::expand`].
pub fn expand(template: &str, params: &[Value]) -> Result<String, ExpandError> {
    Expander::new().expand(template, params)
}
