//! Derivation of the set of tracked files to untrack.

use crate::patterns::PatternSet;
use std::collections::{BTreeSet, HashSet};

/// Combine the tracked-file universe, the effective pattern set and any
/// paths recovered from a tree dump into the sorted set of tracked files
/// to untrack.
///
/// Every returned path is a member of `tracked`. Tree-derived paths that
/// are no longer tracked only contribute their tracked descendants.
pub fn derive_removals(
    tracked: &[String],
    patterns: &PatternSet,
    tree_paths: &[String],
) -> Vec<String> {
    let tracked_set: HashSet<&str> = tracked.iter().map(String::as_str).collect();
    let mut candidates: BTreeSet<&str> = BTreeSet::new();

    // Tracked files that match directly, or through one of their directories
    for path in tracked {
        if patterns.matches(path) || parent_dirs(path).any(|dir| patterns.matches_dir(dir)) {
            candidates.insert(path);
        }
    }

    // Tree entries visible in a snapshot that name artifacts
    let derived: BTreeSet<&str> = tree_paths
        .iter()
        .map(|p| p.trim_end_matches('/'))
        .filter(|p| !p.is_empty() && patterns.matches(p))
        .collect();

    for path in derived {
        if tracked_set.contains(path) {
            candidates.insert(path);
            continue;
        }
        let prefix = format!("{}/", path);
        candidates.extend(
            tracked
                .iter()
                .map(String::as_str)
                .filter(|t| t.starts_with(&prefix)),
        );
    }

    candidates.into_iter().map(String::from).collect()
}

/// Ancestor directories of a `/`-separated relative path, nearest last
fn parent_dirs(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/')
        .map(move |(idx, _)| &path[..idx])
        .filter(|dir| !dir.is_empty())
}
