//! Error Types
//!
//! Structured errors for the configuration parser, rendered the way the
//! original tool reports them: `Error in configuration file <path> line <N>: <message>`.

use std::fmt;
use thiserror::Error;

/// A single parse failure, anchored to the frame (file + line) where it was detected.
#[derive(Debug, Error, Clone)]
pub struct ConfigError {
    pub path: String,
    pub line: usize,
    pub kind: ErrorKind,
}

impl ConfigError {
    pub fn new(path: impl Into<String>, line: usize, kind: ErrorKind) -> Self {
        Self { path: path.into(), line, kind }
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error in configuration file {} line {}: {}",
            self.path, self.line, self.kind
        )
    }
}

/// The underlying cause of a `ConfigError`, independent of where it was detected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("Expecting '='")]
    ExpectingEquals,

    #[error("Unexpected '}}'")]
    UnexpectedCloseBrace,

    #[error("Unterminated quoted value")]
    UnterminatedQuote,

    #[error("Missing '}}' for section")]
    UnclosedSection,

    #[error("Recursive include file: {0}")]
    RecursiveInclude(String),

    #[error("No matches")]
    NoIncludeMatches,

    #[error("{0}")]
    IncludeFailed(String),

    #[error("Invalid boolean: {0}")]
    InvalidBoolean(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    #[error("{0}")]
    Io(String),

    /// An error string returned by a consumer-supplied key/value or section
    /// callback, optionally enriched with the enclosing section's location.
    #[error("{0}")]
    Callback(String),
}

impl ErrorKind {
    /// Wrap a callback error with the location of the section whose handler
    /// most recently accepted a section-open, per the error-enrichment rule.
    pub fn enrich_with_section(message: String, section_path: &str, section_line: usize) -> ErrorKind {
        ErrorKind::Callback(format!(
            "{} (section changed in {} at line {})",
            message, section_path, section_line
        ))
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_path_and_line() {
        let err = ConfigError::new("main.conf", 12, ErrorKind::ExpectingEquals);
        assert_eq!(
            err.to_string(),
            "Error in configuration file main.conf line 12: Expecting '='"
        );
    }

    #[test]
    fn enriches_callback_errors() {
        let kind = ErrorKind::enrich_with_section("nope".to_string(), "main.conf", 3);
        assert_eq!(
            kind.to_string(),
            "nope (section changed in main.conf at line 3)"
        );
    }
}
