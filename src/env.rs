//! Environment Expander
//!
//! Substitutes `$ENV:NAME` tokens in unquoted values with the current
//! process environment. Called only on unquoted `=`-values; quoted values
//! are passed through unescape directly and never reach this function.

/// Expand every `$ENV:NAME` occurrence that sits at the start of `value` or
/// is preceded by whitespace. `NAME` runs up to the next space or end of
/// string. Unset variables expand to the empty string. Any other `$` is
/// copied through verbatim.
pub fn expand_env(value: &str) -> String {
    const MARKER: &str = "$ENV:";

    let mut out = String::with_capacity(value.len());
    let bytes = value.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let at_boundary = i == 0 || bytes[i - 1] == b' ' || bytes[i - 1] == b'\t';
        if at_boundary && value[i..].starts_with(MARKER) {
            let name_start = i + MARKER.len();
            let rest = &value[name_start..];
            let name_len = rest.find(' ').unwrap_or(rest.len());
            let name = &rest[..name_len];
            if let Ok(v) = std::env::var(name) {
                out.push_str(&v);
            }
            i = name_start + name_len;
        } else {
            let ch = value[i..].chars().next().unwrap();
            out.push(ch);
            i += ch.len_utf8();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_var(key: &str, value: &str) {
        // SAFETY: tests run single-threaded per-process for this crate's test binary.
        unsafe { std::env::set_var(key, value) };
    }

    fn remove_var(key: &str) {
        // SAFETY: see `set_var` above.
        unsafe { std::env::remove_var(key) };
    }

    #[test]
    fn expands_at_start_of_value() {
        set_var("CONF_PARSER_TEST_HOME", "/srv/mail");
        assert_eq!(expand_env("$ENV:CONF_PARSER_TEST_HOME"), "/srv/mail");
        remove_var("CONF_PARSER_TEST_HOME");
    }

    #[test]
    fn expands_after_whitespace_only() {
        set_var("CONF_PARSER_TEST_DIR", "mailboxes");
        assert_eq!(expand_env("maildir:$ENV:CONF_PARSER_TEST_DIR"), "maildir:$ENV:CONF_PARSER_TEST_DIR");
        assert_eq!(expand_env("maildir: $ENV:CONF_PARSER_TEST_DIR"), "maildir: mailboxes");
        remove_var("CONF_PARSER_TEST_DIR");
    }

    #[test]
    fn unset_variable_expands_to_empty() {
        remove_var("CONF_PARSER_TEST_UNSET");
        assert_eq!(expand_env("a $ENV:CONF_PARSER_TEST_UNSET b"), "a  b");
    }

    #[test]
    fn other_dollar_signs_are_literal() {
        assert_eq!(expand_env("price: $5"), "price: $5");
    }

    #[test]
    fn name_terminates_at_next_space() {
        set_var("CONF_PARSER_TEST_A", "one");
        assert_eq!(expand_env("$ENV:CONF_PARSER_TEST_A suffix"), "one suffix");
        remove_var("CONF_PARSER_TEST_A");
    }
}
