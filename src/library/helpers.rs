//! Various small helper functions

use std::num::ParseIntError;
use std::time::Duration;
use thiserror::Error;

/// Splits the input string into two parts at the last occurence of the separator
///
/// Returns `None` if the separator is not contained in the input.
pub fn split_at_last<'a>(input: &'a str, separator: &str) -> Option<(&'a str, &'a str)> {
    input
        .rfind(separator)
        .map(|index| (&input[..index], &input[index + separator.len()..]))
}

/// Parses a Duration from a string containing seconds.
/// Useful for command line parsing
pub fn parse_seconds(src: &str) -> Result<Duration, ParseIntError> {
    let seconds = src.parse::<u64>()?;
    Ok(Duration::from_secs(seconds))
}

/// Error returned by [`parse_key_value`]
#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected KEY=VALUE, got {0:?}")]
pub struct KeyValueError(String);

/// Parses a `KEY=VALUE` pair, splitting at the first equals sign.
/// Useful for command line parsing
pub fn parse_key_value(src: &str) -> Result<(String, String), KeyValueError> {
    match src.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(KeyValueError(src.to_string())),
    }
}

#[cfg(test)]
mod does {
    use super::*;

    #[test]
    fn split_at_last_separator() {
        assert_eq!(split_at_last("a.b.c", "."), Some(("a.b", "c")));
        assert_eq!(split_at_last("a::b", "::"), Some(("a", "b")));
    }

    #[test]
    fn not_split_without_separator() {
        assert_eq!(split_at_last("abc", "."), None);
    }

    #[test]
    fn parse_seconds_into_duration() {
        assert_eq!(parse_seconds("5").unwrap(), Duration::from_secs(5));
        assert!(parse_seconds("five").is_err());
    }

    #[test]
    fn parse_key_value_pairs() {
        assert_eq!(
            parse_key_value("user_id=42").unwrap(),
            ("user_id".to_string(), "42".to_string())
        );
        assert_eq!(
            parse_key_value("url=a=b").unwrap(),
            ("url".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_key_value("email=").unwrap(),
            ("email".to_string(), String::new())
        );
        assert!(parse_key_value("no-separator").is_err());
        assert!(parse_key_value("=value").is_err());
    }
}
