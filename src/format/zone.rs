//! Time-zone identifiers for date formatting.
//!
//! Zones come from `date(...)[zone]` options and from the configured default.
//! Region identifiers (`Europe/Paris`, `CET`, `Japan`, `EST5EDT`) resolve
//! through the tz database and follow its daylight-saving rules. Offsets such as
//! `+05:30` or `GMT-3` resolve to a constant offset. The system zone is available
//! as [`TimeZone::Local`] and is what an empty zone resolves to unless configured
//! otherwise.

use chrono::{DateTime, FixedOffset, Local, Utc};
use chrono_tz::{OffsetName, Tz};
use std::fmt;

use crate::core::ExpandError;

/// Zero-offset identifiers that the tz database does not list.
const UTC_ALIASES: &[&str] = &["Z", "UT"];

/// A resolved time zone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimeZone {
    /// The system zone, whose offset depends on the instant.
    #[default]
    Local,
    /// A tz database region, whose offset depends on the instant.
    Region(Tz),
    /// A zone with a constant offset.
    Fixed {
        /// Identifier as written (`+05:30`, `GMT-3`, ...)
        id: String,
        offset: FixedOffset,
    },
}

/// An instant placed in a zone, ready for field extraction.
#[derive(Debug, Clone)]
pub struct ZonedInstant {
    pub datetime: DateTime<FixedOffset>,
    /// Zone identifier printed by `VV`
    pub zone_id: String,
    /// Short zone name printed by `z`, such as `CEST` or `EST`
    pub zone_name: String,
}

impl TimeZone {
    /// The UTC zone.
    #[must_use]
    pub fn utc() -> Self {
        Self::Region(Tz::UTC)
    }

    /// Resolve an identifier.
    ///
    /// Offsets are tried first, then tz database names. Names are
    /// case-sensitive.
    ///
    /// # Errors
    ///
    /// [`ExpandError::UnknownTimeZone`] for anything that is neither a tz
    /// database name nor a well-formed offset.
    pub fn from_id(id: &str) -> Result<Self, ExpandError> {
        if let Some(offset) = fixed_offset(id) {
            return Ok(Self::Fixed {
                id: id.to_string(),
                offset,
            });
        }

        id.parse::<Tz>().map(Self::Region).map_err(|_| ExpandError::UnknownTimeZone {
            zone: id.to_string(),
        })
    }

    /// Place a UTC instant in this zone.
    #[must_use]
    pub fn localize(&self, instant: DateTime<Utc>) -> ZonedInstant {
        match self {
            Self::Local => {
                let datetime = instant.with_timezone(&Local).fixed_offset();
                let zone_id = format_offset_id(datetime.offset().local_minus_utc());
                ZonedInstant {
                    datetime,
                    zone_name: zone_id.clone(),
                    zone_id,
                }
            }
            Self::Region(tz) => {
                let local = instant.with_timezone(tz);
                let zone_name = local.offset().abbreviation().unwrap_or(tz.name()).to_string();
                ZonedInstant {
                    datetime: local.fixed_offset(),
                    zone_id: tz.name().to_string(),
                    zone_name,
                }
            }
            Self::Fixed {
                id,
                offset,
            } => ZonedInstant {
                datetime: instant.with_timezone(offset),
                zone_id: id.clone(),
                zone_name: id.clone(),
            },
        }
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Region(tz) => f.write_str(tz.name()),
            Self::Fixed {
                id,
                ..
            } => f.write_str(id),
        }
    }
}

/// `Z`, `UT`, or an offset with an optional `UTC`, `GMT` or `UT` prefix.
fn fixed_offset(id: &str) -> Option<FixedOffset> {
    if UTC_ALIASES.contains(&id) {
        return FixedOffset::east_opt(0);
    }

    let offset_text = ["UTC", "GMT", "UT"]
        .iter()
        .find_map(|prefix| id.strip_prefix(prefix).filter(|rest| rest.starts_with(['+', '-'])))
        .unwrap_or(id);
    FixedOffset::east_opt(parse_offset(offset_text)?)
}

/// Parse `+H`, `+HH`, `+HHMM`, `+HH:MM` (or `-`) into seconds east of UTC.
fn parse_offset(text: &str) -> Option<i32> {
    let (sign, digits) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };

    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits, "0"),
        4 => (&digits[..2], &digits[2..]),
        5 if digits.as_bytes()[2] == b':' => (&digits[..2], &digits[3..]),
        _ => return None,
    };
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 18 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 3600 + minutes * 60))
}

fn format_offset_id(seconds: i32) -> String {
    if seconds == 0 {
        return "Z".to_string();
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.abs();
    format!("{sign}{:02}:{:02}", abs / 3600, (abs % 3600) / 60)
}
