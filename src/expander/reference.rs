//! Operand references and the shared argument cursor.
//!
//! An operand inside an option (a substring bound, a regex pattern or group, a date
//! pattern or zone) is either literal text or a pointer into the parameter list:
//!
//! - `{}` (or `{0}`) takes the *next* parameter and advances the cursor
//! - `{n}` reads parameter `n` (1-based) and leaves the cursor alone
//!
//! The same cursor drives the base parameter of every `{}` token, so operands and
//! tokens consume parameters from one sequence in evaluation order.

use super::value::{Value, parse_int};
use crate::core::ExpandError;

/// Position of the next sequential parameter for one expansion call.
///
/// The cursor only moves forward.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentCursor {
    consumed: usize,
}

impl ArgumentCursor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the next parameter, returning its 1-based position.
    pub fn advance(&mut self) -> usize {
        self.consumed += 1;
        self.consumed
    }

    /// Number of parameters consumed so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.consumed
    }
}

/// An operand that is either literal text or a parameter lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Literal(String),
    /// `0` means "next sequential parameter", anything else is a 1-based position.
    Cursor(usize),
}

impl Reference {
    /// Classify operand text: `{}` and `{digits}` are cursor references, anything
    /// else is literal.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match text.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')) {
            Some("") => Self::Cursor(0),
            Some(digits) if digits.bytes().all(|b| b.is_ascii_digit()) => {
                // Overflowing positions can never be in range
                Self::Cursor(digits.parse().unwrap_or(usize::MAX))
            }
            _ => Self::Literal(text.to_string()),
        }
    }

    /// A literal reference.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// Resolve to text; out-of-range positions give `""`.
    pub fn resolve_string(&self, params: &[Value], cursor: &mut ArgumentCursor) -> String {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Cursor(index) => {
                param_at(params, bind(*index, cursor)).map(ToString::to_string).unwrap_or_default()
            }
        }
    }

    /// Resolve to an integer; out-of-range positions give `0`.
    ///
    /// # Errors
    ///
    /// [`ExpandError::InvalidInteger`] when the literal or the referenced parameter
    /// does not convert.
    pub fn resolve_int(
        &self,
        params: &[Value],
        cursor: &mut ArgumentCursor,
    ) -> Result<i64, ExpandError> {
        match self {
            Self::Literal(value) => parse_int(value),
            Self::Cursor(index) => {
                param_at(params, bind(*index, cursor)).map_or(Ok(0), Value::as_int)
            }
        }
    }
}

/// Turn a cursor index into a concrete position, consuming a parameter for `0`.
pub(crate) fn bind(index: usize, cursor: &mut ArgumentCursor) -> usize {
    if index == 0 {
        cursor.advance()
    } else {
        index
    }
}

/// Parameter at a 1-based position, if supplied.
pub(crate) fn param_at(params: &[Value], position: usize) -> Option<&Value> {
    position.checked_sub(1).and_then(|i| params.get(i))
}
