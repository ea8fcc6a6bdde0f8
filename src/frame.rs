//! Input Stack
//!
//! A stack of open input sources (path + line-buffered reader + current line
//! number), enabling transparent file nesting for `!include` and cycle
//! detection across the active chain.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One open configuration file with its line cursor.
pub struct InputFrame {
    /// The path as it was resolved when the frame was opened; used for
    /// display and as the base for any further relative includes.
    path: String,
    /// Canonicalized path, used for cycle detection. Falls back to the
    /// resolved (non-canonical) path when canonicalization fails.
    canonical: PathBuf,
    reader: BufReader<File>,
    line_no: usize,
}

impl InputFrame {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            path: path.display().to_string(),
            canonical: canonical_or_given(path),
            reader: BufReader::new(file),
            line_no: 0,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn line(&self) -> usize {
        self.line_no
    }

    /// Read the next physical line, stripping the trailing newline. Returns
    /// `Ok(None)` at EOF. Advances the line counter on every call that
    /// yields a line.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        let n = self.reader.read_line(&mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(Some(buf))
    }
}

fn canonical_or_given(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// The chain of currently-open input frames, innermost (most recently
/// pushed) last.
#[derive(Default)]
pub struct InputStack {
    frames: Vec<InputFrame>,
}

impl InputStack {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Whether a frame with the same canonical path as `path` is already
    /// open somewhere in the chain (cycle detection).
    pub fn contains(&self, path: &Path) -> bool {
        let canonical = canonical_or_given(path);
        self.frames.iter().any(|f| f.canonical == canonical)
    }

    pub fn push(&mut self, frame: InputFrame) {
        self.frames.push(frame);
    }

    /// Pop the innermost frame, e.g. on EOF.
    pub fn pop(&mut self) -> Option<InputFrame> {
        self.frames.pop()
    }

    pub fn top(&self) -> Option<&InputFrame> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut InputFrame> {
        self.frames.last_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_lines_and_strips_newlines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "foo = bar\nbaz = qux\n").unwrap();

        let mut frame = InputFrame::open(file.path()).unwrap();
        assert_eq!(frame.read_line().unwrap().as_deref(), Some("foo = bar"));
        assert_eq!(frame.line(), 1);
        assert_eq!(frame.read_line().unwrap().as_deref(), Some("baz = qux"));
        assert_eq!(frame.line(), 2);
        assert_eq!(frame.read_line().unwrap(), None);
    }

    #[test]
    fn stack_detects_cycle_by_canonical_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut stack = InputStack::new();
        assert!(!stack.contains(file.path()));
        stack.push(InputFrame::open(file.path()).unwrap());
        assert!(stack.contains(file.path()));
    }

    #[test]
    fn stack_pops_in_lifo_order() {
        let a = tempfile::NamedTempFile::new().unwrap();
        let b = tempfile::NamedTempFile::new().unwrap();
        let mut stack = InputStack::new();
        stack.push(InputFrame::open(a.path()).unwrap());
        stack.push(InputFrame::open(b.path()).unwrap());
        assert_eq!(stack.top().unwrap().path(), b.path().display().to_string());
        stack.pop();
        assert_eq!(stack.top().unwrap().path(), a.path().display().to_string());
        stack.pop();
        assert!(stack.is_empty());
    }
}
