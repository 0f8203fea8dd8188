//! Percent-encoding and base64 codecs.
//!
//! The two decoders fail differently:
//! - [`url_decode`] rejects a `%` that is not followed by two hex digits
//! - [`b64_decode`] reports failure as `None` so the operator can fall back to its
//!   input

use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::core::ExpandError;

/// Standard alphabet decoder that accepts input with or without padding.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// `application/x-www-form-urlencoded` encoding of the UTF-8 bytes.
///
/// Alphanumerics and `.-*_` pass through, space becomes `+`, everything else is
/// `%XX` with upper-case hex digits.
#[must_use]
pub fn url_encode(input: &str) -> String {
    url::form_urlencoded::byte_serialize(input.as_bytes()).collect()
}

/// Decode form-urlencoded text; invalid UTF-8 sequences become U+FFFD.
///
/// # Errors
///
/// [`ExpandError::MalformedUrlEncoding`] for a truncated or non-hex escape.
pub fn url_decode(input: &str) -> Result<String, ExpandError> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3).ok_or_else(|| ExpandError::MalformedUrlEncoding {
                input: input.to_string(),
                reason: "incomplete trailing escape".to_string(),
            })?;
            if !escape.iter().all(u8::is_ascii_hexdigit) {
                return Err(ExpandError::MalformedUrlEncoding {
                    input: input.to_string(),
                    reason: format!("illegal hex characters at offset {i}"),
                });
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    // Escapes are valid, so '+' can be rewritten before percent-decoding without
    // touching an encoded "%2B"
    let spaced = input.replace('+', " ");
    Ok(String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned())
}

/// Standard padded base64 of the UTF-8 bytes.
#[must_use]
pub fn b64_encode(input: &str) -> String {
    STANDARD.encode(input.as_bytes())
}

/// Decode standard base64, padding optional. `None` when the input is not base64.
#[must_use]
pub fn b64_decode(input: &str) -> Option<String> {
    LENIENT_STANDARD
        .decode(input.as_bytes())
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encode() {
        assert_eq!(url_encode("a b&c=d"), "a+b%26c%3Dd");
        assert_eq!(url_encode("keep.-*_"), "keep.-*_");
        assert_eq!(url_encode("caf\u{e9}"), "caf%C3%A9");
        assert_eq!(url_encode("~/"), "%7E%2F");
    }

    #[test]
    fn test_url_decode() {
        assert_eq!(url_decode("a+b%26c%3Dd").unwrap(), "a b&c=d");
        assert_eq!(url_decode("1%2B1").unwrap(), "1+1");
        assert_eq!(url_decode("caf%c3%a9").unwrap(), "caf\u{e9}");
        assert_eq!(url_decode("%FF").unwrap(), "\u{fffd}");
    }

    #[test]
    fn test_url_decode_malformed() {
        assert!(matches!(url_decode("100%"), Err(ExpandError::MalformedUrlEncoding { .. })));
        assert!(matches!(url_decode("%4"), Err(ExpandError::MalformedUrlEncoding { .. })));
        assert!(matches!(url_decode("%zz"), Err(ExpandError::MalformedUrlEncoding { .. })));
    }

    #[test]
    fn test_url_round_trip() {
        for s in ["hello world", "a/b?c=d&e", "tab\tand\u{1F600}", ""] {
            assert_eq!(url_decode(&url_encode(s)).unwrap(), s);
        }
    }

    #[test]
    fn test_b64() {
        assert_eq!(b64_encode("cats"), "Y2F0cw==");
        assert_eq!(b64_decode("Y2F0cw==").as_deref(), Some("cats"));
        assert_eq!(b64_decode("Y2F0cw").as_deref(), Some("cats"));
        assert_eq!(b64_decode("cats and dogs"), None);
        assert_eq!(b64_decode("").as_deref(), Some(""));
    }
}
