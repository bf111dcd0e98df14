//! Best-effort extraction of patterns and paths from free-text input files.

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read an optional input file. A missing file is `Ok(None)`; bytes that
/// are not valid UTF-8 are replaced rather than rejected.
pub fn read_optional_text(path: &Path) -> Result<Option<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("Failed to read {}", path.display())),
    }
}

/// Parse a removal list: one pattern per line, `#`/`;` comments, optional
/// `-` or `*` bullets.
pub fn parse_pattern_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with(';'))
        .map(strip_bullets)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Strip leading bullet markers. A marker only counts when whitespace
/// follows it, so `*.log` and `**/dist/**` are left alone.
fn strip_bullets(line: &str) -> &str {
    let mut rest = line;
    loop {
        let after_marker = rest.trim_start_matches(['-', '*']);
        if after_marker.len() == rest.len() {
            return rest;
        }
        // A line made of markers alone carries no pattern
        if after_marker.is_empty() {
            return after_marker;
        }
        if !after_marker.starts_with(char::is_whitespace) {
            return rest;
        }
        rest = after_marker.trim_start();
    }
}

/// Parse a directory-tree dump (as printed by `tree` and similar tools)
/// into relative paths.
pub fn parse_tree_dump(contents: &str) -> Vec<String> {
    contents.lines().filter_map(normalize_tree_line).collect()
}

/// Normalize a single tree line, or `None` if nothing usable remains
pub fn normalize_tree_line(line: &str) -> Option<String> {
    let stripped = line
        .trim_start_matches(is_tree_decoration)
        .trim_end()
        .trim_matches('/');

    if stripped.is_empty() || stripped == "." || stripped == ".." {
        return None;
    }
    Some(stripped.to_string())
}

fn is_tree_decoration(c: char) -> bool {
    // Box Drawing block covers ├ └ │ ─ and the heavy/double variants
    matches!(c, '\u{2500}'..='\u{257F}' | '|' | '`' | '+' | '-' | '\\' | '*') || c.is_whitespace()
}
