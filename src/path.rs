//! Path Resolver
//!
//! Resolves include paths relative to the including file's directory.

use std::path::{Path, PathBuf};

/// Resolve `include_path` relative to `including_file`.
///
/// Absolute paths pass through unchanged. A relative path is joined onto the
/// directory component of `including_file`; if `including_file` has no
/// directory component (e.g. it was opened by a bare file name), the
/// relative path passes through unchanged.
pub fn resolve_include_path(including_file: &str, include_path: &str) -> PathBuf {
    let include_path = Path::new(include_path);
    if include_path.is_absolute() {
        return include_path.to_path_buf();
    }

    match Path::new(including_file).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(include_path),
        _ => include_path.to_path_buf(),
    }
}
