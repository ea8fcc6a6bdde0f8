//! Glob-Expanded Include Loader
//!
//! Expands an `!include`/`!include_try` pattern to zero or more concrete
//! paths: brace expansion (`{a,b,c}`, including nesting) runs first, left to
//! right; each resulting literal is then matched against the filesystem
//! using shell wildcard semantics (`*`, `?`, `[...]`) where present.

use std::path::PathBuf;

/// Expand `pattern` to the ordered list of concrete paths it denotes.
///
/// A literal with no glob metacharacters always yields exactly one path
/// (its existence is not checked here — that happens when the frame is
/// opened). A literal with metacharacters expands via the filesystem; if it
/// matches nothing, it contributes no paths at all, which is how an overall
/// `NOMATCH` naturally falls out of an empty result.
pub fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>, String> {
    let mut out = Vec::new();
    for literal in expand_braces(pattern) {
        if has_glob_metachars(&literal) {
            let mut matches = glob_literal(&literal)?;
            matches.sort();
            out.extend(matches);
        } else {
            out.push(PathBuf::from(literal));
        }
    }
    Ok(out)
}

fn has_glob_metachars(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

fn glob_literal(pattern: &str) -> Result<Vec<PathBuf>, String> {
    let paths = glob::glob(pattern).map_err(|e| e.to_string())?;
    let mut out = Vec::new();
    for entry in paths {
        out.push(entry.map_err(|e| e.to_string())?);
    }
    Ok(out)
}

/// Expand `{a,b,c}` alternation, recursively, left to right. A `{...}` group
/// with no top-level comma is not an alternation and is left untouched
/// (matching shell behavior for a lone brace pair).
fn expand_braces(pattern: &str) -> Vec<String> {
    match split_one_level(pattern) {
        Some((prefix, alternatives, suffix)) => {
            let suffixes = expand_braces(&suffix);
            let mut out = Vec::new();
            for alt in alternatives {
                for alt_expanded in expand_braces(&alt) {
                    for suffix_expanded in &suffixes {
                        out.push(format!("{prefix}{alt_expanded}{suffix_expanded}"));
                    }
                }
            }
            out
        }
        None => vec![pattern.to_string()],
    }
}

/// Find the first top-level `{...}` group containing at least one top-level
/// comma, and split the pattern into (prefix, alternatives, suffix).
fn split_one_level(pattern: &str) -> Option<(String, Vec<String>, String)> {
    let bytes = pattern.as_bytes();
    let open = pattern.find('{')?;

    let mut depth = 0usize;
    let mut alt_starts = vec![open + 1];
    let mut close = None;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            b',' if depth == 1 => alt_starts.push(i + 1),
            _ => {}
        }
    }
    let close = close?;
    if alt_starts.len() < 2 {
        return None;
    }

    let mut alternatives = Vec::with_capacity(alt_starts.len());
    for window in alt_starts.windows(2) {
        alternatives.push(pattern[window[0]..window[1] - 1].to_string());
    }
    alternatives.push(pattern[*alt_starts.last().unwrap()..close].to_string());

    Some((
        pattern[..open].to_string(),
        alternatives,
        pattern[close + 1..].to_string(),
    ))
}
