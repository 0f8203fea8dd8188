//! Date pattern compilation and rendering.
//!
//! Patterns use letter fields (`yyyy-MM-dd'T'HH:mm:ss.SSSX`). A run of the same
//! letter is one field and the run length selects its width or text style. Text in
//! single quotes is literal and `''` is a quote character. Optional-section
//! brackets are accepted and ignored because every field is always available.
//!
//! Names are English only. Week fields count weeks from Sunday, with week 1 being
//! the week that contains January 1st.

use chrono::{Datelike, Timelike};

use super::zone::ZonedInstant;
use crate::core::ExpandError;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Indexed by days from Sunday
const DAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const QUARTERS: [&str; 4] = ["1st quarter", "2nd quarter", "3rd quarter", "4th quarter"];

/// Long display names by zone abbreviation, for `zzzz`.
const ZONE_NAMES: &[(&str, &str)] = &[
    ("UTC", "Coordinated Universal Time"),
    ("Z", "Coordinated Universal Time"),
    ("GMT", "Greenwich Mean Time"),
    ("UT", "Universal Time"),
    ("BST", "British Summer Time"),
    ("WET", "Western European Standard Time"),
    ("WEST", "Western European Summer Time"),
    ("CET", "Central European Standard Time"),
    ("CEST", "Central European Summer Time"),
    ("EET", "Eastern European Standard Time"),
    ("EEST", "Eastern European Summer Time"),
    ("EST", "Eastern Standard Time"),
    ("EDT", "Eastern Daylight Time"),
    ("CST", "Central Standard Time"),
    ("CDT", "Central Daylight Time"),
    ("MST", "Mountain Standard Time"),
    ("MDT", "Mountain Daylight Time"),
    ("PST", "Pacific Standard Time"),
    ("PDT", "Pacific Daylight Time"),
    ("HST", "Hawaii Standard Time"),
    ("JST", "Japan Standard Time"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Literal(String),
    Field { letter: char, count: usize },
}

/// A compiled date pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    items: Vec<Item>,
}

impl DatePattern {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// [`ExpandError::InvalidDatePattern`] for an unknown letter, a field run that
    /// is too long, a reserved character (`{`, `}`, `#`) or an unterminated quote.
    pub fn compile(pattern: &str) -> Result<Self, ExpandError> {
        let invalid = |reason: String| ExpandError::InvalidDatePattern {
            pattern: pattern.to_string(),
            reason,
        };

        let mut items = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '\'' => {
                    if chars.peek() == Some(&'\'') {
                        chars.next();
                        literal.push('\'');
                        continue;
                    }
                    let mut closed = false;
                    while let Some(q) = chars.next() {
                        if q == '\'' {
                            if chars.peek() == Some(&'\'') {
                                chars.next();
                                literal.push('\'');
                            } else {
                                closed = true;
                                break;
                            }
                        } else {
                            literal.push(q);
                        }
                    }
                    if !closed {
                        return Err(invalid("unterminated quoted text".to_string()));
                    }
                }
                '[' | ']' => {}
                '{' | '}' | '#' => {
                    return Err(invalid(format!("reserved character '{c}'")));
                }
                c if c.is_ascii_alphabetic() => {
                    let mut count = 1;
                    while chars.peek() == Some(&c) {
                        chars.next();
                        count += 1;
                    }
                    check_field(c, count).map_err(invalid)?;
                    if !literal.is_empty() {
                        items.push(Item::Literal(std::mem::take(&mut literal)));
                    }
                    items.push(Item::Field {
                        letter: c,
                        count,
                    });
                }
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            items.push(Item::Literal(literal));
        }
        Ok(Self {
            items,
        })
    }

    /// Render a zoned instant.
    #[must_use]
    pub fn render(&self, zoned: &ZonedInstant) -> String {
        let mut out = String::new();
        for item in &self.items {
            match item {
                Item::Literal(text) => out.push_str(text),
                Item::Field {
                    letter,
                    count,
                } => out.push_str(&render_field(*letter, *count, zoned)),
            }
        }
        out
    }
}

/// Longest allowed run per letter, or an error for letters that are not fields.
fn check_field(letter: char, count: usize) -> Result<(), String> {
    let max = match letter {
        'G' | 'M' | 'L' | 'Q' | 'q' | 'E' | 'e' | 'X' | 'x' | 'Z' => 5,
        'u' | 'y' | 'Y' | 'N' | 'A' => 19,
        'd' | 'w' | 'h' | 'K' | 'k' | 'H' | 'm' | 's' => 2,
        'D' => 3,
        'W' | 'a' => 1,
        'S' | 'n' => 9,
        'z' => 4,
        'c' if count == 2 => return Err("invalid pattern \"cc\"".to_string()),
        'c' => 5,
        'V' if count != 2 => return Err("pattern letter 'V' must be \"VV\"".to_string()),
        'V' => 2,
        'O' if count != 1 && count != 4 => {
            return Err("pattern letter 'O' must be \"O\" or \"OOOO\"".to_string());
        }
        'O' => 4,
        other => return Err(format!("unknown pattern letter '{other}'")),
    };
    if count > max {
        return Err(format!("too many pattern letters: {letter}"));
    }
    Ok(())
}

fn render_field(letter: char, count: usize, zoned: &ZonedInstant) -> String {
    let dt = &zoned.datetime;
    let offset = dt.offset().local_minus_utc();
    let weekday = dt.weekday().num_days_from_sunday() as usize;
    let month = dt.month0() as usize;
    let nano = i64::from(dt.nanosecond() % 1_000_000_000);

    match letter {
        'G' => {
            let ad = dt.year() > 0;
            let text = match count {
                4 if ad => "Anno Domini",
                4 => "Before Christ",
                5 if ad => "A",
                5 => "B",
                _ if ad => "AD",
                _ => "BC",
            };
            text.to_string()
        }
        'y' => year(i64::from(year_of_era(dt.year())), count),
        'u' => year(i64::from(dt.year()), count),
        'Y' => year(i64::from(week_based(dt).0), count),
        'M' | 'L' => match count {
            3 => MONTHS[month][..3].to_string(),
            4 => MONTHS[month].to_string(),
            5 => MONTHS[month][..1].to_string(),
            _ => number(i64::from(dt.month()), count),
        },
        'd' => number(i64::from(dt.day()), count),
        'D' => number(i64::from(dt.ordinal()), count),
        'Q' | 'q' => {
            let quarter = month / 3;
            match count {
                3 => format!("Q{}", quarter + 1),
                4 => QUARTERS[quarter].to_string(),
                _ => number(quarter as i64 + 1, if count == 2 { 2 } else { 1 }),
            }
        }
        'w' => number(i64::from(week_based(dt).1), count),
        'W' => {
            let first = (weekday + 35 - (dt.day0() as usize % 7)) % 7;
            number(((dt.day0() as usize + first) / 7 + 1) as i64, count)
        }
        'E' => day_name(weekday, count),
        'e' | 'c' if count <= 2 => number(weekday as i64 + 1, count),
        'e' | 'c' => day_name(weekday, count),
        'a' if dt.hour() < 12 => "AM".to_string(),
        'a' => "PM".to_string(),
        'h' => number(i64::from((dt.hour() + 11) % 12 + 1), count),
        'K' => number(i64::from(dt.hour() % 12), count),
        'k' => number(i64::from((dt.hour() + 23) % 24 + 1), count),
        'H' => number(i64::from(dt.hour()), count),
        'm' => number(i64::from(dt.minute()), count),
        's' => number(i64::from(dt.second()), count),
        'S' => format!("{nano:09}")[..count].to_string(),
        'n' => number(nano, count),
        'N' => number(i64::from(dt.num_seconds_from_midnight()) * 1_000_000_000 + nano, count),
        'A' => number(
            i64::from(dt.num_seconds_from_midnight()) * 1000 + nano / 1_000_000,
            count,
        ),
        'V' => zoned.zone_id.clone(),
        'z' if count == 4 => ZONE_NAMES
            .iter()
            .find(|(abbreviation, _)| *abbreviation == zoned.zone_name)
            .map_or_else(|| localized_offset(offset, true), |(_, name)| (*name).to_string()),
        'z' => zoned.zone_name.clone(),
        'O' => localized_offset(offset, count == 4),
        'X' if offset == 0 => "Z".to_string(),
        'X' | 'x' => iso_offset(offset, count),
        'Z' => match count {
            4 => localized_offset(offset, true),
            5 if offset == 0 => "Z".to_string(),
            5 => iso_offset(offset, 3),
            _ => iso_offset(offset, 2),
        },
        _ => String::new(),
    }
}

fn year_of_era(year: i32) -> i32 {
    if year > 0 { year } else { 1 - year }
}

/// Week-based year and week number, weeks starting on Sunday with week 1
/// containing January 1st.
fn week_based(dt: &impl Datelike) -> (i32, u32) {
    let ordinal0 = dt.ordinal0();
    let weekday = dt.weekday().num_days_from_sunday();
    // Day of week of January 1st, Sunday = 0
    let jan1 = (weekday + 7 * 53 - ordinal0 % 7) % 7;

    let days_in_year = if is_leap(dt.year()) { 366 } else { 365 };
    let next_jan1 = (jan1 + days_in_year) % 7;
    let next_week1_start = days_in_year - next_jan1;
    if next_jan1 != 0 && ordinal0 >= next_week1_start {
        return (dt.year() + 1, 1);
    }

    (dt.year(), (ordinal0 + jan1) / 7 + 1)
}

fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn year(value: i64, count: usize) -> String {
    if count == 2 {
        return format!("{:02}", value.rem_euclid(100));
    }
    let text = number(value, count);
    if count >= 4 && value >= 0 && text.len() > count {
        return format!("+{text}");
    }
    text
}

fn number(value: i64, width: usize) -> String {
    if value < 0 {
        format!("-{:0width$}", value.unsigned_abs())
    } else {
        format!("{value:0width$}")
    }
}

fn day_name(days_from_sunday: usize, count: usize) -> String {
    let name = DAYS[days_from_sunday];
    match count {
        4 => name.to_string(),
        5 => name[..1].to_string(),
        _ => name[..3].to_string(),
    }
}

/// `GMT`, `GMT+8`, `GMT+5:30` (short) or `GMT+08:00` (full).
fn localized_offset(seconds: i32, full: bool) -> String {
    if seconds == 0 {
        return "GMT".to_string();
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.unsigned_abs();
    let (hours, minutes, secs) = (abs / 3600, abs % 3600 / 60, abs % 60);

    let mut out = if full {
        format!("GMT{sign}{hours:02}:{minutes:02}")
    } else if minutes != 0 || secs != 0 {
        format!("GMT{sign}{hours}:{minutes:02}")
    } else {
        format!("GMT{sign}{hours}")
    };
    if secs != 0 {
        out.push_str(&format!(":{secs:02}"));
    }
    out
}

/// ISO-8601 offset by field width: `+HHmm` (minutes only when non-zero),
/// `+HHMM`, `+HH:MM`, `+HHMMss`, `+HH:MM:ss`.
fn iso_offset(seconds: i32, count: usize) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.unsigned_abs();
    let (hours, minutes, secs) = (abs / 3600, abs % 3600 / 60, abs % 60);

    match count {
        1 if minutes == 0 => format!("{sign}{hours:02}"),
        1 | 2 => format!("{sign}{hours:02}{minutes:02}"),
        3 => format!("{sign}{hours:02}:{minutes:02}"),
        4 if secs == 0 => format!("{sign}{hours:02}{minutes:02}"),
        4 => format!("{sign}{hours:02}{minutes:02}{secs:02}"),
        _ if secs == 0 => format!("{sign}{hours:02}:{minutes:02}"),
        _ => format!("{sign}{hours:02}:{minutes:02}:{secs:02}"),
    }
}
