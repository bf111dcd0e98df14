//! Managed block synchronization for `.gitignore`.
//!
//! The tool owns exactly one delimited region of the ignore file. Anything
//! outside that region belongs to the user and is preserved byte-for-byte.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub const MANAGED_BLOCK_BEGIN: &str = "### BEGIN: artifact-purge managed ###";
pub const MANAGED_BLOCK_END: &str = "### END: artifact-purge managed ###";

/// Render the managed block (markers included, no trailing newline)
pub fn render_block<S: AsRef<str>>(rules: &[S]) -> String {
    let mut lines = Vec::with_capacity(rules.len() + 2);
    lines.push(MANAGED_BLOCK_BEGIN);
    for rule in rules {
        lines.push(rule.as_ref());
    }
    lines.push(MANAGED_BLOCK_END);
    lines.join("\n")
}

/// Merge `rules` into `existing`, returning the new content and whether it
/// differs from the input.
///
/// An existing block has its interior replaced in place. Otherwise the
/// block is appended after a separating newline when the content does not
/// already end with one.
pub fn sync_managed_block<S: AsRef<str>>(existing: &str, rules: &[S]) -> (String, bool) {
    let block = render_block(rules);

    let updated = match find_block(existing) {
        Some((start, end)) => format!("{}{}{}", &existing[..start], block, &existing[end..]),
        None => {
            let separator = if existing.is_empty() || existing.ends_with('\n') {
                ""
            } else {
                "\n"
            };
            format!("{}{}{}\n", existing, separator, block)
        }
    };

    let changed = updated != existing;
    (updated, changed)
}

/// Byte range of the first complete block, end marker included
fn find_block(content: &str) -> Option<(usize, usize)> {
    let start = content.find(MANAGED_BLOCK_BEGIN)?;
    let search_from = start + MANAGED_BLOCK_BEGIN.len();
    let end = content[search_from..].find(MANAGED_BLOCK_END)?;
    Some((start, search_from + end + MANAGED_BLOCK_END.len()))
}

/// Apply the managed block to the ignore file at `path`.
///
/// Returns whether the content changed. Nothing is written when the file
/// is already up to date, or when `write` is false.
pub fn update_ignore_file<S: AsRef<str>>(path: &Path, rules: &[S], write: bool) -> Result<bool> {
    let existing = match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read {}", path.display()))
        }
    };

    let (updated, changed) = sync_managed_block(&existing, rules);
    if changed && write {
        fs::write(path, updated).with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(changed)
}
