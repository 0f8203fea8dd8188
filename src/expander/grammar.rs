//! Option grammar for replacement tokens.
//!
//! The body of a replacement token is a sequence of options, each optionally
//! followed by one comma, closed by `}`:
//!
//! ```text
//! body    := (option ","?)* "}"
//! option  := DIGITS
//!          | "trim" | ("to")? ("lower" | "upper")
//!          | ("url" | "b64" | "base64") ("en" | "de") "code"
//!          | substr | printf | date
//! substr  := "[" ( index ((":" | ",") bound)? | "/" pattern "/" group ) "]"
//! printf  := "%" [-#+ 0,(]? DIGITS? ("." DIGITS)? [bhscdoxefga]
//! date    := ("date" | "now") ("(" format ")" ("[" zone "]")?)?
//! ```
//!
//! Keywords and conversion letters match case-insensitively. Because the body
//! is parsed structurally, `}` may appear inside a regex pattern or a date format.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{escaped, tag_no_case, take_while, take_while1},
    character::complete::{char, digit0, digit1, one_of, satisfy},
    combinator::{map, opt, recognize, value},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated, tuple},
};

use super::operator::Operator;
use super::reference::Reference;

/// Where a token's starting value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Base {
    /// The next sequential parameter
    #[default]
    Next,
    /// A 1-based parameter position
    Position(usize),
    /// The current instant
    Now,
}

/// A compiled replacement token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenSpec {
    pub base: Base,
    pub operators: Vec<Operator>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Directive {
    Position(usize),
    Now(Operator),
    Op(Operator),
}

// =============================================================================
// ENTRY POINT
// =============================================================================

/// Parse a token body from just after its `{` up to and including the closing
/// `}`, returning the text that follows.
pub fn replacement_body(input: &str) -> IResult<&str, TokenSpec> {
    map(
        terminated(many0(terminated(option, opt(char(',')))), char('}')),
        |directives| {
            let mut spec = TokenSpec::default();
            for directive in directives {
                match directive {
                    Directive::Position(0) => spec.base = Base::Next,
                    Directive::Position(n) => spec.base = Base::Position(n),
                    Directive::Now(op) => {
                        spec.base = Base::Now;
                        spec.operators.push(op);
                    }
                    Directive::Op(op) => spec.operators.push(op),
                }
            }
            spec
        },
    )(input)
}

fn option(input: &str) -> IResult<&str, Directive> {
    alt((
        position,
        value(Directive::Op(Operator::Trim), tag_no_case("trim")),
        case_change,
        codec,
        map(substr, Directive::Op),
        map(printf_spec, |spec: &str| Directive::Op(Operator::PrintfFormat(spec.to_string()))),
        date,
    ))(input)
}

// =============================================================================
// SIMPLE OPTIONS
// =============================================================================

fn position(input: &str) -> IResult<&str, Directive> {
    // Positions too large to represent can never be in range
    map(digit1, |digits: &str| Directive::Position(digits.parse().unwrap_or(usize::MAX)))(input)
}

fn case_change(input: &str) -> IResult<&str, Directive> {
    preceded(
        opt(tag_no_case("to")),
        alt((
            value(Directive::Op(Operator::Lower), tag_no_case("lower")),
            value(Directive::Op(Operator::Upper), tag_no_case("upper")),
        )),
    )(input)
}

fn codec(input: &str) -> IResult<&str, Directive> {
    #[derive(Clone, Copy)]
    enum Scheme {
        Url,
        Base64,
    }

    let scheme = alt((
        value(Scheme::Url, tag_no_case("url")),
        value(Scheme::Base64, tag_no_case("b64")),
        value(Scheme::Base64, tag_no_case("base64")),
    ));
    let direction = alt((value(true, tag_no_case("en")), value(false, tag_no_case("de"))));

    map(
        terminated(pair(scheme, direction), tag_no_case("code")),
        |(scheme, encode)| {
            Directive::Op(match (scheme, encode) {
                (Scheme::Url, true) => Operator::UrlEncode,
                (Scheme::Url, false) => Operator::UrlDecode,
                (Scheme::Base64, true) => Operator::B64Encode,
                (Scheme::Base64, false) => Operator::B64Decode,
            })
        },
    )(input)
}

// =============================================================================
// SUBSTRING AND REGEX
// =============================================================================

fn substr(input: &str) -> IResult<&str, Operator> {
    delimited(char('['), alt((index_bounds, regex_extract)), char(']'))(input)
}

/// `{}`, `{n}` or digits.
fn index(input: &str) -> IResult<&str, Reference> {
    map(alt((digit1, recognize(delimited(char('{'), digit0, char('}'))))), Reference::parse)(input)
}

fn index_bounds(input: &str) -> IResult<&str, Operator> {
    let signed = map(recognize(preceded(opt(char('-')), digit1)), Reference::literal);
    let bound = alt((signed, index));

    map(pair(index, opt(pair(one_of(":,"), bound))), |(from, rest)| match rest {
        None => Operator::SubstrRange {
            from,
            to: Reference::literal("-1"),
        },
        Some((',', to)) => Operator::SubstrRange {
            from,
            to,
        },
        Some((_, len)) => Operator::SubstrLen {
            from,
            len,
        },
    })(input)
}

fn regex_extract(input: &str) -> IResult<&str, Operator> {
    map(
        pair(
            delimited(char('/'), |i| escaped_text(i, '/'), char('/')),
            take_while(|c: char| c != ']'),
        ),
        |(pattern, group): (&str, &str)| Operator::RegexExtract {
            pattern: Reference::parse(pattern),
            group: Reference::parse(group),
        },
    )(input)
}

/// Text in which `terminator` and `\` appear only as `\x` escape pairs. The
/// escapes are kept as written.
fn escaped_text(input: &str, terminator: char) -> IResult<&str, &str> {
    let plain = take_while1(|c: char| c != terminator && c != '\\');
    map(opt(escaped(plain, '\\', satisfy(|_| true))), Option::unwrap_or_default)(input)
}

// =============================================================================
// PRINTF
// =============================================================================

fn printf_spec(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        char('%'),
        opt(one_of("-#+ 0,(")),
        digit0,
        opt(preceded(char('.'), digit1)),
        satisfy(|c| "bhscdoxefga".contains(c.to_ascii_lowercase())),
    )))(input)
}

// =============================================================================
// DATES
// =============================================================================

fn date(input: &str) -> IResult<&str, Directive> {
    let keyword = alt((value(false, tag_no_case("date")), value(true, tag_no_case("now"))));
    let zone = delimited(
        char('['),
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        char(']'),
    );
    let format = delimited(char('('), |i| escaped_text(i, ')'), char(')'));

    map(pair(keyword, opt(pair(format, opt(zone)))), |(now, args)| {
        let (format, zone) = args.unwrap_or_default();
        let op = Operator::DateFormat {
            pattern: Reference::parse(&unescape(format)),
            zone: Reference::literal(zone.unwrap_or_default()),
        };
        if now { Directive::Now(op) } else { Directive::Op(op) }
    })(input)
}

/// Replace every `\x` pair with `x`.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.extend(chars.next());
        } else {
            out.push(c);
        }
    }
    out
}
