//! Single-pass token scanner.
//!
//! The scanner walks the template once, yielding literal runs between the
//! recognized tokens. At each `{` (possibly preceded by backslashes) it tries, in
//! order, a replacement token, the conditional-open marker `{?}` and the
//! conditional-close marker `{.}`. When none applies the characters stay literal and
//! scanning resumes one character later, so a valid token nested inside a malformed
//! one is still found. Malformed syntax never produces an error.

use std::fmt;

use super::grammar::{TokenSpec, replacement_body};

/// A lexical unit of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'t> {
    /// Text copied verbatim.
    Literal(&'t str),
    /// A `{...}` token preceded by `escape` (0 to 2) backslashes.
    Replacement {
        escape: u8,
        /// Option text between the braces
        raw: &'t str,
        spec: TokenSpec,
    },
    /// `{?}`
    ConditionalOpen,
    /// `{.}`
    ConditionalClose,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "literal {text:?}"),
            Self::Replacement {
                escape,
                raw,
                spec,
            } => write!(
                f,
                "replacement {{{raw}}} escape={escape} base={:?} operators={}",
                spec.base,
                spec.operators.len()
            ),
            Self::ConditionalOpen => f.write_str("conditional-open"),
            Self::ConditionalClose => f.write_str("conditional-close"),
        }
    }
}

/// Iterator over the tokens of a template.
///
/// # Examples
///
/// ```
/// use expander::expander::{Scanner, Token};
///
/// let tokens: Vec<_> = Scanner::new("a{?}{}").collect();
/// assert_eq!(tokens[0], Token::Literal("a"));
/// assert_eq!(tokens[1], Token::ConditionalOpen);
/// ```
#[derive(Debug, Clone)]
pub struct Scanner<'t> {
    template: &'t str,
    /// Start of the text not yet yielded
    position: usize,
    /// A token found after a literal run, yielded on the following call
    pending: Option<Token<'t>>,
}

impl<'t> Scanner<'t> {
    #[must_use]
    pub const fn new(template: &'t str) -> Self {
        Self {
            template,
            position: 0,
            pending: None,
        }
    }

    /// Find the next token at or after `from`, as `(start, end, token)`.
    fn find_token(&self, mut from: usize) -> Option<(usize, usize, Token<'t>)> {
        let text = self.template;

        while let Some(offset) = text[from..].find(['\\', '{']) {
            let start = from + offset;
            let run = text[start..].bytes().take_while(|&b| b == b'\\').count();
            let brace = start + run;
            if !text[brace..].starts_with('{') {
                from = brace;
                continue;
            }

            // Only the last two backslashes of a run belong to the token
            let escape = run.min(2);
            if let Ok((rest, spec)) = replacement_body(&text[brace + 1..]) {
                let end = text.len() - rest.len();
                let token = Token::Replacement {
                    escape: escape as u8,
                    raw: &text[brace + 1..end - 1],
                    spec,
                };
                return Some((brace - escape, end, token));
            }

            let marker = &text[brace..];
            if marker.starts_with("{?}") {
                return Some((brace, brace + 3, Token::ConditionalOpen));
            }
            if marker.starts_with("{.}") {
                return Some((brace, brace + 3, Token::ConditionalClose));
            }
            from = brace + 1;
        }
        None
    }
}

impl<'t> Iterator for Scanner<'t> {
    type Item = Token<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }
        if self.position >= self.template.len() {
            return None;
        }

        let start = self.position;
        match self.find_token(start) {
            Some((token_start, end, token)) => {
                self.position = end;
                if token_start == start {
                    Some(token)
                } else {
                    self.pending = Some(token);
                    Some(Token::Literal(&self.template[start..token_start]))
                }
            }
            None => {
                self.position = self.template.len();
                Some(Token::Literal(&self.template[start..]))
            }
        }
    }
}
