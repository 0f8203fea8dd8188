//! Operators applied to a token's working value.

use chrono::{TimeZone as _, Utc};
use fancy_regex::Regex;

use super::reference::{ArgumentCursor, Reference};
use super::value::Value;
use crate::constants::DEFAULT_DATE_PATTERN;
use crate::core::ExpandError;
use crate::format::{DatePattern, TimeZone, codec, printf};

/// One step of a token's transformation chain.
///
/// Operands are [`Reference`]s and are resolved when the operator runs, so cursor
/// references consume parameters in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Trim,
    Lower,
    Upper,
    UrlEncode,
    UrlDecode,
    B64Encode,
    B64Decode,
    /// Characters `[from, to)`; a negative `to` counts back from the end.
    SubstrRange {
        from: Reference,
        to: Reference,
    },
    /// `len` characters starting at `from`.
    SubstrLen {
        from: Reference,
        len: Reference,
    },
    /// First match of `pattern`, or one of its groups.
    RegexExtract {
        pattern: Reference,
        group: Reference,
    },
    /// printf-style conversion of the typed working value.
    PrintfFormat(String),
    /// Date rendering of an instant or epoch-millisecond integer.
    DateFormat {
        pattern: Reference,
        zone: Reference,
    },
}

/// Per-call state an operator can read or advance.
pub(crate) struct Scope<'a> {
    pub params: &'a [Value],
    pub cursor: &'a mut ArgumentCursor,
    pub default_zone: &'a TimeZone,
}

impl Scope<'_> {
    fn string(&mut self, reference: &Reference) -> String {
        reference.resolve_string(self.params, self.cursor)
    }

    fn int(&mut self, reference: &Reference) -> Result<i64, ExpandError> {
        reference.resolve_int(self.params, self.cursor)
    }
}

impl Operator {
    /// Apply to the working value, producing the next one.
    pub(crate) fn apply(&self, working: Value, scope: &mut Scope<'_>) -> Result<Value, ExpandError> {
        let result = match self {
            Self::Trim => working.to_string().trim().to_string(),
            Self::Lower => working.to_string().to_lowercase(),
            Self::Upper => working.to_string().to_uppercase(),
            Self::UrlEncode => codec::url_encode(&working.to_string()),
            Self::UrlDecode => codec::url_decode(&working.to_string())?,
            Self::B64Encode => codec::b64_encode(&working.to_string()),
            Self::B64Decode => {
                let text = working.to_string();
                codec::b64_decode(&text).unwrap_or(text)
            }
            Self::SubstrRange {
                from,
                to,
            } => {
                let from = scope.int(from)?;
                let to = scope.int(to)?;
                substr_range(&working.to_string(), from, to)
            }
            Self::SubstrLen {
                from,
                len,
            } => {
                let from = scope.int(from)?;
                let len = scope.int(len)?;
                substr_len(&working.to_string(), from, len)
            }
            Self::RegexExtract {
                pattern,
                group,
            } => extract(&working.to_string(), pattern, group, scope)?,
            Self::PrintfFormat(spec) => printf::format_value(spec, &working)?,
            Self::DateFormat {
                pattern,
                zone,
            } => format_date(&working, pattern, zone, scope)?,
        };
        Ok(Value::Text(result))
    }
}

fn char_slice(text: &str, from: usize, to: usize) -> String {
    text.chars().skip(from).take(to.saturating_sub(from)).collect()
}

/// Characters `[from, to)` with `from` clamped into the text, a negative `to`
/// counted from the end (`-1` is the end) and `to` never before `from`.
fn substr_range(text: &str, from: i64, to: i64) -> String {
    let len = text.chars().count() as i64;
    let from = from.clamp(0, len);
    let to = if to < 0 { (len + 1 + to).max(0) } else { to.min(len) };
    char_slice(text, from as usize, to.max(from) as usize)
}

/// `len` characters from `from`, with `from` clamped to the last character.
fn substr_len(text: &str, from: i64, len: i64) -> String {
    let count = text.chars().count() as i64;
    let from = from.clamp(0, (count - 1).max(0));
    let to = from.saturating_add(len.max(0)).min(count);
    char_slice(text, from as usize, to as usize)
}

/// Unanchored search. The group is resolved only once the pattern has matched.
fn extract(
    text: &str,
    pattern: &Reference,
    group: &Reference,
    scope: &mut Scope<'_>,
) -> Result<String, ExpandError> {
    let pattern = scope.string(pattern);
    let invalid = |e: fancy_regex::Error| ExpandError::InvalidPattern {
        pattern: pattern.clone(),
        reason: e.to_string(),
    };
    let regex = Regex::new(&pattern).map_err(invalid)?;

    let Some(captures) = regex.captures(text).map_err(invalid)? else {
        return Ok(String::new());
    };

    let group = scope.string(group);
    let matched = if group.is_empty() {
        captures.get(0)
    } else if group.bytes().all(|b| b.is_ascii_digit()) {
        group.parse::<usize>().ok().and_then(|index| captures.get(index))
    } else {
        captures.name(&group)
    };
    Ok(matched.map(|m| m.as_str().to_string()).unwrap_or_default())
}

/// Pattern and zone are resolved (and validated) before the value is looked at.
fn format_date(
    working: &Value,
    pattern: &Reference,
    zone: &Reference,
    scope: &mut Scope<'_>,
) -> Result<String, ExpandError> {
    let pattern = scope.string(pattern);
    let zone_id = scope.string(zone);

    let pattern = DatePattern::compile(if pattern.is_empty() { DEFAULT_DATE_PATTERN } else { &pattern })?;
    let explicit;
    let zone = if zone_id.is_empty() {
        scope.default_zone
    } else {
        explicit = TimeZone::from_id(&zone_id)?;
        &explicit
    };

    let instant = match working {
        Value::Instant(instant) => *instant,
        Value::Int(millis) => match Utc.timestamp_millis_opt(*millis).single() {
            Some(instant) => instant,
            None => return Ok(String::new()),
        },
        _ => return Ok(String::new()),
    };
    Ok(pattern.render(&zone.localize(instant)))
}
