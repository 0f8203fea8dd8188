//! Conversion of command-line arguments into template parameters.
//!
//! Positional parameters are text unless they carry a type prefix:
//!
//! | Argument                      | Value                    |
//! |-------------------------------|--------------------------|
//! | `hello`                       | text `hello`             |
//! | `str:int:5`                   | text `int:5`             |
//! | `int:42`                      | integer 42               |
//! | `float:2.5`                   | float 2.5                |
//! | `instant:2020-05-05T16:52:02Z` | instant (RFC 3339)      |
//! | `millis:1588697522346`        | instant from epoch millis |
//! | `null:`                       | null                     |
//!
//! `--json` takes an array whose elements map the same way: strings to text,
//! integers and floats to numbers, `null` to null and booleans to `"true"` or
//! `"false"`.

use chrono::{DateTime, TimeZone as _, Utc};

use crate::core::ExpandError;
use crate::expander::Value;

/// Convert one positional argument.
///
/// # Errors
///
/// [`ExpandError::InvalidParameter`] when a prefixed value does not parse.
pub fn parse_param(arg: &str) -> Result<Value, ExpandError> {
    let invalid = |reason: String| ExpandError::InvalidParameter {
        value: arg.to_string(),
        reason,
    };

    let Some((prefix, rest)) = arg.split_once(':') else {
        return Ok(Value::Text(arg.to_string()));
    };

    match prefix {
        "str" => Ok(Value::Text(rest.to_string())),
        "int" => rest.trim().parse().map(Value::Int).map_err(|e| invalid(format!("{e}"))),
        "float" => rest.trim().parse().map(Value::Float).map_err(|e| invalid(format!("{e}"))),
        "instant" => DateTime::parse_from_rfc3339(rest.trim())
            .map(|dt| Value::Instant(dt.with_timezone(&Utc)))
            .map_err(|e| invalid(format!("expected an RFC 3339 timestamp: {e}"))),
        "millis" => {
            let millis: i64 = rest.trim().parse().map_err(|e| invalid(format!("{e}")))?;
            Utc.timestamp_millis_opt(millis)
                .single()
                .map(Value::Instant)
                .ok_or_else(|| invalid("timestamp out of range".to_string()))
        }
        "null" if rest.is_empty() => Ok(Value::Null),
        "null" => Err(invalid("null: takes no value".to_string())),
        _ => Ok(Value::Text(arg.to_string())),
    }
}

/// Convert positional arguments in order.
///
/// # Errors
///
/// The first argument that fails [`parse_param`].
pub fn parse_params<S: AsRef<str>>(args: &[S]) -> Result<Vec<Value>, ExpandError> {
    args.iter().map(|arg| parse_param(arg.as_ref())).collect()
}

/// Convert a JSON array into parameters.
///
/// # Errors
///
/// Returns an error if the text is not JSON, is not an array, or holds objects
/// or nested arrays.
pub fn params_from_json(text: &str) -> anyhow::Result<Vec<Value>> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    let serde_json::Value::Array(items) = json else {
        return Err(ExpandError::InvalidParameter {
            value: text.to_string(),
            reason: "expected a JSON array".to_string(),
        }
        .into());
    };

    items
        .into_iter()
        .map(|item| match item {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Text(b.to_string())),
            serde_json::Value::String(s) => Ok(Value::Text(s)),
            serde_json::Value::Number(n) => Ok(match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            }),
            other => Err(ExpandError::InvalidParameter {
                value: other.to_string(),
                reason: "array elements must be strings, numbers, booleans or null".to_string(),
            }
            .into()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FIXTURE_MILLIS, fixture_instant};

    #[test]
    fn test_plain_text() {
        assert_eq!(parse_param("hello").unwrap(), Value::Text("hello".into()));
        assert_eq!(parse_param("").unwrap(), Value::Text(String::new()));
        assert_eq!(parse_param("a:b").unwrap(), Value::Text("a:b".into()));
        assert_eq!(parse_param("http://x").unwrap(), Value::Text("http://x".into()));
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(parse_param("str:int:5").unwrap(), Value::Text("int:5".into()));
        assert_eq!(parse_param("int:-42").unwrap(), Value::Int(-42));
        assert_eq!(parse_param("float:2.5").unwrap(), Value::Float(2.5));
        assert_eq!(parse_param("null:").unwrap(), Value::Null);
        assert_eq!(
            parse_param("instant:2020-05-05T16:52:02.346Z").unwrap(),
            Value::Instant(fixture_instant())
        );
        assert_eq!(
            parse_param(&format!("millis:{FIXTURE_MILLIS}")).unwrap(),
            Value::Instant(fixture_instant())
        );
    }

    #[test]
    fn test_invalid_prefixed_values() {
        for arg in ["int:4.5", "int:", "float:x", "instant:yesterday", "millis:soon", "null:x"] {
            let err = parse_param(arg).unwrap_err();
            assert!(matches!(err, ExpandError::InvalidParameter { .. }), "{arg}: {err:?}");
        }
    }

    #[test]
    fn test_parse_params_keeps_order() {
        let params = parse_params(&["a", "int:1", "null:"]).unwrap();
        assert_eq!(params, vec![Value::Text("a".into()), Value::Int(1), Value::Null]);
    }

    #[test]
    fn test_json_array() {
        let params = params_from_json(r#"["a", 3, 2.5, null, true]"#).unwrap();
        assert_eq!(
            params,
            vec![
                Value::Text("a".into()),
                Value::Int(3),
                Value::Float(2.5),
                Value::Null,
                Value::Text("true".into()),
            ]
        );
    }

    #[test]
    fn test_json_errors() {
        assert!(params_from_json("{").is_err());
        assert!(params_from_json(r#"{"a": 1}"#).is_err());
        assert!(params_from_json(r#"[[1]]"#).is_err());
    }
}
