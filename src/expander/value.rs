//! Typed template parameters.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use std::fmt;

use crate::core::ExpandError;

/// A parameter supplied to an expansion call.
///
/// Values keep their type until an operator needs text. Printf conversions and date
/// formatting look at the type directly; every other operator works on the text
/// representation produced by [`Display`](fmt::Display).
///
/// | Variant   | Text representation                        |
/// |-----------|--------------------------------------------|
/// | `Text`    | the string itself                          |
/// | `Int`     | decimal digits                             |
/// | `Float`   | shortest round-trip decimal                |
/// | `Instant` | RFC 3339, millisecond precision, `Z` zone  |
/// | `Null`    | empty string                               |
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
    Instant(DateTime<Utc>),
    Null,
}

impl Value {
    /// Short type name used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Instant(_) => "instant",
            Self::Null => "null",
        }
    }

    /// Integer view of the value, as used by substring bounds.
    ///
    /// Integers pass through, floats truncate toward zero and null is `0`. Text
    /// (and the text form of an instant) must parse as a decimal integer, with the
    /// empty string counting as `0`.
    pub fn as_int(&self) -> Result<i64, ExpandError> {
        match self {
            Self::Int(n) => Ok(*n),
            Self::Float(f) => Ok(f.trunc() as i64),
            Self::Null => Ok(0),
            other => parse_int(&other.to_string()),
        }
    }
}

/// Parse decimal text as an integer, treating the empty string as zero.
pub(crate) fn parse_int(text: &str) -> Result<i64, ExpandError> {
    if text.is_empty() {
        return Ok(0);
    }
    text.parse().map_err(|_| ExpandError::InvalidInteger {
        value: text.to_string(),
    })
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Instant(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Null => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Instant(t)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(t: DateTime<FixedOffset>) -> Self {
        Self::Instant(t.with_timezone(&Utc))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Build a `Vec<Value>` from heterogeneous literals.
///
/// ```
/// use expander::{params, Value};
///
/// let p = params!["hamburger", 4, 2.5, Value::Null];
/// assert_eq!(p[1], Value::Int(4));
/// ```
#[macro_export]
macro_rules! params {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::Value::from($value)),*]
    };
}
