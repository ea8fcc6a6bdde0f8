//! Value Coercers
//!
//! Pure functions translating a textual setting value into `bool` or
//! non-negative integer. Used both by the definition-driven setter and by
//! any consumer that wants to coerce a value outside of a `SettingDef`.

use crate::error::ErrorKind;

/// Parse a case-insensitive `yes`/`no` into a `bool`.
pub fn parse_bool(value: &str) -> Result<bool, ErrorKind> {
    match value.to_ascii_lowercase().as_str() {
        "yes" => Ok(true),
        "no" => Ok(false),
        _ => Err(ErrorKind::InvalidBoolean(value.to_string())),
    }
}

/// Parse a non-negative decimal or octal (`0NNN`) integer, C `%i`-style.
///
/// A leading `0` followed by further digits is interpreted as octal; anything
/// else is decimal. A leading `-` always fails, since the source value is
/// documented as non-negative.
pub fn parse_uint(value: &str) -> Result<u64, ErrorKind> {
    let invalid = || ErrorKind::InvalidNumber(value.to_string());

    if value.is_empty() || value.starts_with('-') {
        return Err(invalid());
    }

    let radix = if value.len() > 1 && value.as_bytes()[0] == b'0' {
        8
    } else {
        10
    };

    u64::from_str_radix(value, radix).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_yes_no_case_insensitively() {
        assert_eq!(parse_bool("yes"), Ok(true));
        assert_eq!(parse_bool("YES"), Ok(true));
        assert_eq!(parse_bool("No"), Ok(false));
    }

    #[test]
    fn rejects_other_boolean_spellings() {
        assert!(parse_bool("true").is_err());
        assert!(parse_bool("1").is_err());
        assert!(parse_bool("").is_err());
    }

    #[test]
    fn parses_decimal_and_octal() {
        assert_eq!(parse_uint("42"), Ok(42));
        assert_eq!(parse_uint("0"), Ok(0));
        assert_eq!(parse_uint("0755"), Ok(0o755));
    }

    #[test]
    fn rejects_negative_and_malformed_numbers() {
        assert!(parse_uint("-1").is_err());
        assert!(parse_uint("abc").is_err());
        assert!(parse_uint("12x").is_err());
        assert!(parse_uint("0999").is_err());
    }
}
