//! Line Scanner / Tokenizer
//!
//! Turns a stream of physical lines from an [`InputFrame`](crate::frame::InputFrame)
//! into logical lines: leading whitespace and blank/comment lines are
//! dropped, in-line comments are stripped with quote awareness, and a
//! trailing unquoted `\` joins the next physical line.

use crate::error::{ConfigError, ErrorKind};
use crate::frame::InputFrame;

/// A fully-assembled logical line, ready for structural dispatch.
pub struct LogicalLine {
    pub text: String,
    pub path: String,
    pub line: usize,
}

/// Accumulates continuation chunks across physical lines. One scanner is
/// shared for the whole parse; its buffer is always empty between logical
/// lines.
#[derive(Default)]
pub struct LineScanner {
    buffer: String,
}

impl LineScanner {
    pub fn new() -> Self {
        Self { buffer: String::new() }
    }

    /// Read and assemble the next logical line from `frame`. Returns `Ok(None)`
    /// at a clean EOF (no continuation pending).
    pub fn next_logical_line(&mut self, frame: &mut InputFrame) -> Result<Option<LogicalLine>, ConfigError> {
        loop {
            let raw = frame
                .read_line()
                .map_err(|e| ConfigError::new(frame.path(), frame.line(), ErrorKind::Io(e.to_string())))?;

            let raw = match raw {
                Some(line) => line,
                None => {
                    if !self.buffer.is_empty() {
                        let path = frame.path().to_string();
                        let line = frame.line();
                        self.buffer.clear();
                        return Err(ConfigError::new(
                            path,
                            line,
                            ErrorKind::Io("Unexpected end of file while continuing previous line".to_string()),
                        ));
                    }
                    return Ok(None);
                }
            };

            let after_leading_ws = raw.trim_start_matches([' ', '\t']);
            if after_leading_ws.is_empty() || after_leading_ws.starts_with('#') {
                continue;
            }

            let (content, ambiguous) = strip_comment(after_leading_ws)
                .map_err(|kind| ConfigError::new(frame.path(), frame.line(), kind))?;
            if ambiguous {
                eprintln!(
                    "{}:{}: warning: ambiguous '#' not preceded by whitespace, treated as a comment",
                    frame.path(),
                    frame.line()
                );
            }

            let content = content.trim_end_matches([' ', '\t']);

            if let Some(continued) = content.strip_suffix('\\') {
                self.push_chunk(continued);
                continue;
            }

            self.push_chunk(content);
            return Ok(Some(LogicalLine {
                text: std::mem::take(&mut self.buffer),
                path: frame.path().to_string(),
                line: frame.line(),
            }));
        }
    }

    fn push_chunk(&mut self, chunk: &str) {
        if self.buffer.is_empty() {
            self.buffer.push_str(chunk);
        } else {
            self.buffer.push(' ');
            self.buffer.push_str(chunk);
        }
    }
}

/// Scan `line` for an in-line comment, skipping quoted spans. Quoted spans
/// start at `'` or `"` and run to the matching quote; `\X` inside a quoted
/// span escapes any character, including the quote itself. A `#` outside
/// quotes ends the line; if it's not preceded by whitespace, the second
/// element of the returned tuple is `true` (ambiguous, warn but still cut).
///
/// Outside quotes, `\` has no special meaning — it is not an escape
/// character there.
///
/// Returns `Err` if the line ends while still inside a quoted span.
fn strip_comment(line: &str) -> Result<(&str, bool), ErrorKind> {
    let bytes = line.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' && i + 1 < bytes.len() {
                    i += 2;
                    continue;
                }
                if b == q {
                    quote = None;
                }
                i += 1;
            }
            None => match b {
                b'\'' | b'"' => {
                    quote = Some(b);
                    i += 1;
                }
                b'#' => {
                    let ambiguous = i > 0 && bytes[i - 1] != b' ' && bytes[i - 1] != b'\t';
                    return Ok((&line[..i], ambiguous));
                }
                _ => i += 1,
            },
        }
    }

    if quote.is_some() {
        return Err(ErrorKind::UnterminatedQuote);
    }

    Ok((line, false))
}

/// Unescape `\X` sequences (any `X`) inside the content of an already
/// quote-stripped value.
pub fn unescape(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}
