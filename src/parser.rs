//! Structural Parser
//!
//! Turns the logical-line stream from [`LineScanner`] into dispatched
//! events: `key = value` assignments, section open/close, and transparent
//! file includes. Tracks section nesting depth, skip mode (bodies whose
//! section callback declined them, or whose handler doesn't implement
//! `open`), and path-addressed targeting (`parse_file` called with
//! `target: Some(...)`).

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use crate::env::expand_env;
use crate::error::{ConfigError, ErrorKind};
use crate::frame::{InputFrame, InputStack};
use crate::handler::ConfigHandler;
use crate::include::expand_pattern;
use crate::path::resolve_include_path;
use crate::scanner::{unescape, LineScanner, LogicalLine};

/// Parse `root`, dispatching every event to `handler`.
///
/// When `target` is `Some("A/B/C")`, only the subtree addressed by that
/// slash-separated path is dispatched; everything else is parsed
/// structurally (so nesting and includes still work) but produces no
/// callbacks. Parsing ends as soon as that subtree's closing brace is
/// seen. A target that never matches yields `Ok(())` with zero callbacks.
pub fn parse_file(root: &Path, target: Option<&str>, handler: &mut dyn ConfigHandler) -> Result<(), ConfigError> {
    let mut parser = Parser::new(target);
    let frame = InputFrame::open(root)
        .map_err(|e| ConfigError::new(root.display().to_string(), 0, ErrorKind::Io(e.to_string())))?;
    parser.stack.push(frame);
    parser.run(handler)
}

enum Flow {
    Continue,
    Terminate,
}

struct Parser {
    stack: InputStack,
    scanner: LineScanner,
    depth: usize,
    skip: usize,
    target: Option<VecDeque<String>>,
    matched_depth: usize,
    resolved: bool,
    leaf_depth: Option<usize>,
    path_exhausted: bool,
    root_section: Option<usize>,
    last_section: Option<(String, usize)>,
    last_location: Option<(String, usize)>,
}

impl Parser {
    fn new(target: Option<&str>) -> Self {
        let target = target.map(|s| s.split('/').map(|c| c.to_string()).collect::<VecDeque<_>>());
        Self {
            stack: InputStack::new(),
            scanner: LineScanner::new(),
            depth: 0,
            skip: 0,
            target,
            matched_depth: 0,
            resolved: false,
            leaf_depth: None,
            path_exhausted: false,
            root_section: None,
            last_section: None,
            last_location: None,
        }
    }

    /// Whether we're still navigating toward the targeted subtree, or have
    /// already passed through it entirely. In both states, callbacks are
    /// suppressed and new section-opens are auto-rejected rather than
    /// offered to the handler.
    fn is_path_gated(&self) -> bool {
        self.target.is_some() && (!self.resolved || self.path_exhausted)
    }

    fn run(&mut self, handler: &mut dyn ConfigHandler) -> Result<(), ConfigError> {
        loop {
            let frame = match self.stack.top_mut() {
                Some(f) => f,
                None => break,
            };

            let logical = match self.scanner.next_logical_line(frame)? {
                Some(l) => l,
                None => {
                    self.stack.pop();
                    continue;
                }
            };

            self.last_location = Some((logical.path.clone(), logical.line));

            match self.dispatch(&logical, handler)? {
                Flow::Continue => continue,
                Flow::Terminate => return Ok(()),
            }
        }

        if self.depth != 0 {
            let (path, line) = self.last_location.clone().unwrap_or_default();
            return Err(ConfigError::new(path, line, ErrorKind::UnclosedSection));
        }
        Ok(())
    }

    fn dispatch(&mut self, logical: &LogicalLine, handler: &mut dyn ConfigHandler) -> Result<Flow, ConfigError> {
        let stmt = classify(&logical.text).ok_or_else(|| self.err(logical, ErrorKind::ExpectingEquals))?;

        match stmt {
            Stmt::Close => self.on_close(logical, handler),
            Stmt::Include { tolerant, pattern } => self.on_include(&pattern, tolerant, logical).map(|_| Flow::Continue),
            Stmt::Assignment { key, raw_value } => {
                self.on_assignment(&key, &raw_value, logical, handler)?;
                Ok(Flow::Continue)
            }
            Stmt::SectionOpen { kind, name } => self.on_section_open(&kind, &name, logical, handler),
        }
    }

    fn on_assignment(
        &mut self,
        key: &str,
        raw_value: &str,
        logical: &LogicalLine,
        handler: &mut dyn ConfigHandler,
    ) -> Result<(), ConfigError> {
        if self.skip > 0 || self.is_path_gated() {
            return Ok(());
        }

        let (value, quoted) = interpret_value(raw_value);
        handler.assign(key, &value, quoted).map_err(|msg| self.wrap_callback_error(logical, msg))
    }

    fn on_section_open(
        &mut self,
        kind: &str,
        name: &str,
        logical: &LogicalLine,
        handler: &mut dyn ConfigHandler,
    ) -> Result<Flow, ConfigError> {
        self.depth += 1;

        if self.skip > 0 {
            self.skip += 1;
            return Ok(Flow::Continue);
        }

        if self.is_path_gated() && !self.resolved {
            let expected = self.target.as_ref().and_then(|t| t.get(self.matched_depth)).cloned();
            if expected.as_deref() == Some(kind) {
                return self.accept_section(kind, name, logical, handler, true);
            }
            self.skip = 1;
            return Ok(Flow::Continue);
        }

        if self.is_path_gated() {
            // resolved && path_exhausted: the targeted subtree is already
            // behind us, this is a fresh sibling of something on that path.
            self.skip = 1;
            return Ok(Flow::Continue);
        }

        self.accept_section(kind, name, logical, handler, false)
    }

    fn accept_section(
        &mut self,
        kind: &str,
        name: &str,
        logical: &LogicalLine,
        handler: &mut dyn ConfigHandler,
        is_first_target_match: bool,
    ) -> Result<Flow, ConfigError> {
        match handler.open(kind, name) {
            Ok(true) => {
                self.last_section = Some((logical.path.clone(), logical.line));
                if is_first_target_match {
                    if self.matched_depth == 0 {
                        self.root_section = Some(self.depth);
                    }
                    self.matched_depth += 1;
                    if self.target.as_ref().is_some_and(|t| self.matched_depth == t.len()) {
                        self.resolved = true;
                        self.leaf_depth = Some(self.depth);
                    }
                }
            }
            Ok(false) => {
                self.skip = 1;
            }
            Err(msg) => return Err(self.wrap_callback_error(logical, msg)),
        }
        Ok(Flow::Continue)
    }

    fn on_close(&mut self, logical: &LogicalLine, handler: &mut dyn ConfigHandler) -> Result<Flow, ConfigError> {
        if self.depth == 0 {
            return Err(self.err(logical, ErrorKind::UnexpectedCloseBrace));
        }
        self.depth -= 1;

        if self.skip > 0 {
            self.skip -= 1;
            return Ok(Flow::Continue);
        }

        handler.close().map_err(|msg| self.wrap_callback_error(logical, msg))?;

        if self.resolved && !self.path_exhausted && self.leaf_depth == Some(self.depth + 1) {
            self.path_exhausted = true;
        }

        if let Some(root) = self.root_section {
            if self.depth < root {
                return Ok(Flow::Terminate);
            }
        }
        Ok(Flow::Continue)
    }

    fn on_include(&mut self, pattern: &str, tolerant: bool, logical: &LogicalLine) -> Result<(), ConfigError> {
        let current_path = self.stack.top().map(|f| f.path().to_string()).unwrap_or_default();
        let resolved = resolve_include_path(&current_path, pattern.trim());
        let matches = expand_pattern(&resolved.to_string_lossy())
            .map_err(|e| self.err(logical, ErrorKind::IncludeFailed(e)))?;

        if matches.is_empty() {
            if tolerant {
                return Ok(());
            }
            return Err(self.err(logical, ErrorKind::NoIncludeMatches));
        }

        let mut opened: Vec<InputFrame> = Vec::new();
        let mut opened_canonical: HashSet<PathBuf> = HashSet::new();

        for candidate in &matches {
            if self.stack.contains(candidate) || opened_canonical.contains(&canonicalize(candidate)) {
                return Err(self.err(logical, ErrorKind::RecursiveInclude(candidate.display().to_string())));
            }
            match InputFrame::open(candidate) {
                Ok(frame) => {
                    opened_canonical.insert(canonicalize(candidate));
                    opened.push(frame);
                }
                Err(e) if tolerant && e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(self.err(logical, ErrorKind::Io(e.to_string()))),
            }
        }

        for frame in opened.into_iter().rev() {
            self.stack.push(frame);
        }
        Ok(())
    }

    fn err(&self, logical: &LogicalLine, kind: ErrorKind) -> ConfigError {
        ConfigError::new(logical.path.clone(), logical.line, kind)
    }

    fn wrap_callback_error(&self, logical: &LogicalLine, message: String) -> ConfigError {
        let kind = match &self.last_section {
            Some((path, line)) => ErrorKind::enrich_with_section(message, path, *line),
            None => ErrorKind::Callback(message),
        };
        self.err(logical, kind)
    }
}

fn canonicalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

enum Stmt {
    Close,
    Include { tolerant: bool, pattern: String },
    Assignment { key: String, raw_value: String },
    SectionOpen { kind: String, name: String },
}

/// Classify one logical line's text into a statement. `None` means the
/// text matched none of the recognized shapes (`Expecting '='`).
fn classify(text: &str) -> Option<Stmt> {
    if text == "}" {
        return Some(Stmt::Close);
    }

    let key_end = text.find([' ', '\t', '=']).unwrap_or(text.len());
    let key = &text[..key_end];
    let remainder = text[key_end..].trim_start_matches([' ', '\t']);

    if key == "!include" || key == "!include_try" {
        return Some(Stmt::Include {
            tolerant: key == "!include_try",
            pattern: remainder.to_string(),
        });
    }

    if let Some(rest) = remainder.strip_prefix('=') {
        let value = rest.trim_start_matches([' ', '\t']);
        return Some(Stmt::Assignment {
            key: key.to_string(),
            raw_value: value.to_string(),
        });
    }

    if let Some(name_and_brace) = remainder.strip_suffix('{') {
        let name = name_and_brace.trim_end_matches([' ', '\t']);
        if name.contains([' ', '\t']) {
            return None;
        }
        return Some(Stmt::SectionOpen {
            kind: key.to_string(),
            name: name.to_string(),
        });
    }

    None
}

/// Interpret a raw assignment value: a matching pair of outer quotes is
/// stripped and its contents unescaped; otherwise the value is expanded
/// for `$ENV:NAME` references. Returns `(value, was_quoted)`.
fn interpret_value(raw: &str) -> (String, bool) {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' || first == b'\'') && first == last {
            return (unescape(&raw[1..raw.len() - 1]), true);
        }
    }
    (expand_env(raw), false)
}
