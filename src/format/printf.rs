//! printf-style formatting of a single typed value.
//!
//! A specifier has the shape `%[flags][width][.precision]conversion`:
//!
//! | Conversion | Accepts            | Output                                      |
//! |------------|--------------------|---------------------------------------------|
//! | `b` `B`    | anything           | `false` for null, otherwise `true`          |
//! | `h` `H`    | anything           | hex of a 32-bit hash                        |
//! | `s` `S`    | anything           | text representation                         |
//! | `c` `C`    | integer, 1-char text | the character                             |
//! | `d`        | integer            | decimal                                     |
//! | `o` `x` `X`| integer            | octal / hex, two's complement for negatives |
//! | `e` `E`    | float              | scientific, exponent at least two digits    |
//! | `f`        | float              | fixed point                                 |
//! | `g` `G`    | float              | fixed or scientific by magnitude            |
//! | `a` `A`    | float              | hexadecimal significand and binary exponent |
//!
//! Flags: `-` left-justify, `#` alternate form, `+` always signed, space for a
//! leading space on positives, `0` zero padding, `,` digit grouping, `(` negatives
//! in parentheses. `%%` and `%n` are literal. Upper-case conversions upper-case the
//! whole result. A null value renders as empty text under every conversion but `b`.
//!
//! A type mismatch, a flag that does not apply to the conversion, `-`/`0` without a
//! width, or precision on an integer conversion is an error.

use crate::core::ExpandError;
use crate::expander::Value;

const FLAG_CHARS: &str = "-#+ 0,(";

/// Format `value` with a format string containing at most one value conversion.
///
/// # Errors
///
/// [`ExpandError::FormatMismatch`] when the value's type does not fit the
/// conversion, [`ExpandError::InvalidFormat`] for malformed specifiers.
pub fn format_value(format: &str, value: &Value) -> Result<String, ExpandError> {
    let mut out = String::with_capacity(format.len());
    let mut rest = format;
    let mut consumed = false;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let (spec, remaining) = Spec::parse(&rest[pos..], format)?;
        rest = remaining;

        match spec.conversion {
            '%' => out.push_str(&spec.justify("%".to_string())),
            'n' => out.push('\n'),
            _ if consumed => {
                return Err(spec.invalid("only one value is available to format"));
            }
            _ => {
                consumed = true;
                out.push_str(&spec.render(value)?);
            }
        }
    }

    out.push_str(rest);
    Ok(out)
}

#[derive(Debug)]
struct Spec<'a> {
    /// The specifier text, for error messages
    text: &'a str,
    flags: &'a str,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
}

impl<'a> Spec<'a> {
    /// Parse one specifier from text starting at `%`, returning the remainder.
    fn parse(text: &'a str, format: &str) -> Result<(Self, &'a str), ExpandError> {
        let invalid = |reason: &str| ExpandError::InvalidFormat {
            spec: format.to_string(),
            reason: reason.to_string(),
        };

        let body = &text[1..];
        let flag_len = body.find(|c: char| !FLAG_CHARS.contains(c)).unwrap_or(body.len());
        let flags = &body[..flag_len];
        for (i, flag) in flags.char_indices() {
            if flags[..i].contains(flag) {
                return Err(invalid(&format!("duplicate flag '{flag}'")));
            }
        }

        let rest = &body[flag_len..];
        let width_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let width = parse_count(&rest[..width_len]).map_err(|()| invalid("width out of range"))?;

        let mut rest = &rest[width_len..];
        let mut precision = None;
        if let Some(after_dot) = rest.strip_prefix('.') {
            let len = after_dot.find(|c: char| !c.is_ascii_digit()).unwrap_or(after_dot.len());
            if len == 0 {
                return Err(invalid("missing precision after '.'"));
            }
            precision =
                parse_count(&after_dot[..len]).map_err(|()| invalid("precision out of range"))?;
            rest = &after_dot[len..];
        }

        let conversion = rest.chars().next().ok_or_else(|| invalid("missing conversion"))?;
        let rest = &rest[conversion.len_utf8()..];
        let spec = Self {
            text: &text[..text.len() - rest.len()],
            flags,
            width,
            precision,
            conversion,
        };
        spec.validate()?;
        Ok((spec, rest))
    }

    fn validate(&self) -> Result<(), ExpandError> {
        if (self.has('-') || self.has('0')) && self.width.is_none() {
            return Err(self.invalid("flags '-' and '0' require a width"));
        }
        if self.has('-') && self.has('0') {
            return Err(self.invalid("flags '-' and '0' cannot be combined"));
        }
        if self.has('+') && self.has(' ') {
            return Err(self.invalid("flags '+' and ' ' cannot be combined"));
        }
        Ok(())
    }

    fn has(&self, flag: char) -> bool {
        self.flags.contains(flag)
    }

    fn allow_only(&self, allowed: &str) -> Result<(), ExpandError> {
        match self.flags.chars().find(|flag| !allowed.contains(*flag)) {
            Some(flag) => Err(self.invalid(&format!(
                "flag '{flag}' does not apply to conversion '{}'",
                self.conversion
            ))),
            None => Ok(()),
        }
    }

    fn no_precision(&self) -> Result<(), ExpandError> {
        if self.precision.is_some() {
            return Err(self.invalid("precision is not allowed for this conversion"));
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> ExpandError {
        ExpandError::InvalidFormat {
            spec: self.text.to_string(),
            reason: reason.to_string(),
        }
    }

    fn mismatch(&self, value: &Value) -> ExpandError {
        ExpandError::FormatMismatch {
            spec: self.text.to_string(),
            value_type: value.type_name(),
        }
    }

    fn render(&self, value: &Value) -> Result<String, ExpandError> {
        if matches!(self.conversion, 'D' | 'O' | 'F') {
            return Err(self.invalid("unknown conversion"));
        }
        if matches!(value, Value::Null) && !self.conversion.eq_ignore_ascii_case(&'b') {
            return Ok(self.justify(String::new()));
        }
        let body = match self.conversion.to_ascii_lowercase() {
            'b' => {
                self.allow_only("-")?;
                let text = if matches!(value, Value::Null) { "false" } else { "true" };
                self.truncate(text)
            }
            'h' => {
                self.allow_only("-")?;
                self.truncate(&format!("{:x}", hash_code(value) as u32))
            }
            's' => {
                self.allow_only("-")?;
                self.truncate(&value.to_string())
            }
            'c' => {
                self.allow_only("-")?;
                self.no_precision()?;
                self.character(value)?
            }
            'd' => {
                self.allow_only("-+ 0,(")?;
                self.no_precision()?;
                let Value::Int(n) = value else {
                    return Err(self.mismatch(value));
                };
                let mut digits = n.unsigned_abs().to_string();
                if self.has(',') {
                    digits = group_thousands(&digits);
                }
                return Ok(self.case(self.number(*n < 0, "", digits)));
            }
            'o' | 'x' => {
                self.allow_only("-#0")?;
                self.no_precision()?;
                let Value::Int(n) = value else {
                    return Err(self.mismatch(value));
                };
                let bits = *n as u64;
                let (prefix, digits) = if self.conversion.eq_ignore_ascii_case(&'o') {
                    ("0", format!("{bits:o}"))
                } else {
                    ("0x", format!("{bits:x}"))
                };
                let prefix = if self.has('#') { prefix } else { "" };
                return Ok(self.case(self.number(false, prefix, digits)));
            }
            'e' | 'f' | 'g' | 'a' => {
                let Value::Float(x) = value else {
                    return Err(self.mismatch(value));
                };
                return self.float(*x).map(|s| self.case(s));
            }
            _ => return Err(self.invalid("unknown conversion")),
        };
        Ok(self.justify(self.case(body)))
    }

    fn character(&self, value: &Value) -> Result<String, ExpandError> {
        match value {
            Value::Int(n) => u32::try_from(*n)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .ok_or_else(|| self.invalid(&format!("{n} is not a valid code point"))),
            other => Err(self.mismatch(other)),
        }
    }

    fn float(&self, x: f64) -> Result<String, ExpandError> {
        let conversion = self.conversion.to_ascii_lowercase();
        match conversion {
            'e' => self.allow_only("-#+ 0(")?,
            'f' => self.allow_only("-#+ 0,(")?,
            'g' => self.allow_only("-+ 0,(")?,
            _ => self.allow_only("-#+ 0")?,
        }

        if !x.is_finite() {
            let text = if x.is_nan() { "NaN" } else { "Infinity" };
            let negative = x.is_sign_negative() && !x.is_nan();
            let signed = self.sign_wrap(negative, text.to_string());
            return Ok(self.justify(signed));
        }

        let negative = x.is_sign_negative() && x != 0.0;
        let abs = x.abs();
        let precision = self.precision.unwrap_or(6);
        let (prefix, magnitude) = match conversion {
            'e' => ("", self.alternate_point(scientific(abs, precision))),
            'f' => ("", self.fixed(abs, precision)),
            'g' => {
                let precision = precision.max(1);
                let exponent = if abs == 0.0 { 0 } else { decimal_exponent(abs, precision - 1) };
                if (-4..precision as i32).contains(&exponent) {
                    let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
                    ("", self.fixed(abs, decimals))
                } else {
                    ("", scientific(abs, precision - 1))
                }
            }
            _ => ("0x", hex_float(abs, self.precision)),
        };
        Ok(self.number(negative, prefix, magnitude))
    }

    fn fixed(&self, abs: f64, precision: usize) -> String {
        let text = format!("{abs:.precision$}");
        let text = match (self.has(','), text.split_once('.')) {
            (true, Some((int, frac))) => format!("{}.{frac}", group_thousands(int)),
            (true, None) => group_thousands(&text),
            (false, _) => text,
        };
        self.alternate_point(text)
    }

    /// With `#`, keep a decimal point even when no digits follow it.
    fn alternate_point(&self, text: String) -> String {
        if !self.has('#') || text.contains('.') {
            return text;
        }
        match text.find(['e', 'E']) {
            Some(pos) => format!("{}.{}", &text[..pos], &text[pos..]),
            None => text + ".",
        }
    }

    /// Assemble sign, prefix and digits, applying zero padding and justification.
    fn number(&self, negative: bool, prefix: &str, digits: String) -> String {
        let (lead, trail) = match (negative, self.has('(')) {
            (true, true) => ("(", ")"),
            (true, false) => ("-", ""),
            (false, _) if self.has('+') => ("+", ""),
            (false, _) if self.has(' ') => (" ", ""),
            _ => ("", ""),
        };

        let mut zeros = String::new();
        if let (true, Some(width)) = (self.has('0'), self.width) {
            let used = lead.len() + prefix.len() + digits.chars().count() + trail.len();
            zeros = "0".repeat(width.saturating_sub(used));
        }

        self.justify(format!("{lead}{prefix}{zeros}{digits}{trail}"))
    }

    fn sign_wrap(&self, negative: bool, text: String) -> String {
        match (negative, self.has('(')) {
            (true, true) => format!("({text})"),
            (true, false) => format!("-{text}"),
            (false, _) if self.has('+') => format!("+{text}"),
            (false, _) if self.has(' ') => format!(" {text}"),
            _ => text,
        }
    }

    fn truncate(&self, text: &str) -> String {
        match self.precision {
            Some(p) => text.chars().take(p).collect(),
            None => text.to_string(),
        }
    }

    fn case(&self, text: String) -> String {
        if self.conversion.is_ascii_uppercase() { text.to_uppercase() } else { text }
    }

    fn justify(&self, text: String) -> String {
        let len = text.chars().count();
        match self.width {
            Some(width) if len < width => {
                let fill = " ".repeat(width - len);
                if self.has('-') { text + &fill } else { fill + &text }
            }
            _ => text,
        }
    }
}

fn parse_count(digits: &str) -> Result<Option<usize>, ()> {
    if digits.is_empty() {
        return Ok(None);
    }
    digits.parse().map(Some).map_err(|_| ())
}

/// `d.ddde+XX` with at least two exponent digits.
fn scientific(abs: f64, precision: usize) -> String {
    let text = format!("{abs:.precision$e}");
    let (mantissa, exponent) = text.split_once('e').unwrap_or((&text, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.abs())
}

/// Decimal exponent of `abs` after rounding to `precision` fractional digits in
/// scientific notation.
fn decimal_exponent(abs: f64, precision: usize) -> i32 {
    let text = format!("{abs:.precision$e}");
    text.split_once('e').and_then(|(_, exp)| exp.parse().ok()).unwrap_or(0)
}

/// Hexadecimal significand and binary exponent, e.g. `1.921fb54442d18p1`.
fn hex_float(abs: f64, precision: Option<usize>) -> String {
    const MANTISSA_BITS: u32 = 52;
    const MANTISSA_MASK: u64 = (1 << MANTISSA_BITS) - 1;

    if abs == 0.0 {
        return "0.0p0".to_string();
    }

    let bits = abs.to_bits();
    let biased = ((bits >> MANTISSA_BITS) & 0x7ff) as i64;
    let mut mantissa = bits & MANTISSA_MASK;
    let (mut lead, mut exponent) = if biased == 0 { (0u64, -1022) } else { (1u64, biased - 1023) };

    let mut digits = 13;
    if let Some(p) = precision.filter(|p| (1..13).contains(p)) {
        let shift = 4 * (13 - p) as u32;
        mantissa = (mantissa + (1u64 << (shift - 1))) >> shift;
        if mantissa >> (4 * p) != 0 {
            mantissa &= (1u64 << (4 * p)) - 1;
            lead += 1;
        }
        if lead == 2 {
            lead = 1;
            exponent += 1;
        }
        digits = p;
    }

    let mut hex = format!("{mantissa:0digits$x}");
    if precision.is_none() {
        let trimmed = hex.trim_end_matches('0').len().max(1);
        hex.truncate(trimmed);
    }
    format!("{lead}.{hex}p{exponent}")
}

/// Insert `,` between groups of three digits.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Stable 32-bit hash used by `%h`.
fn hash_code(value: &Value) -> i32 {
    let fold = |n: u64| (n ^ (n >> 32)) as i32;
    match value {
        Value::Text(s) => s
            .encode_utf16()
            .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit))),
        Value::Int(n) => fold(*n as u64),
        Value::Float(x) => fold(if x.is_nan() { 0x7ff8_0000_0000_0000 } else { x.to_bits() }),
        Value::Instant(t) => fold(t.timestamp_millis() as u64),
        Value::Null => 0,
    }
}
