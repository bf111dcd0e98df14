//! Standard artifact definitions from standards.toml and glob pattern matching.

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::collections::HashSet;

/// Structure to deserialize the standard definitions from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct Standards {
    pub ignore: IgnoreConfig,
    pub remove: RemoveConfig,
    #[serde(default)]
    pub signatures: Vec<Signature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IgnoreConfig {
    /// Rules written into the managed `.gitignore` block, in order
    pub rules: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoveConfig {
    /// Recursive patterns that select tracked artifacts for untracking
    pub patterns: Vec<String>,
}

/// A named verification signature: tracked paths must not contain any of
/// these directory segments once artifacts are purged.
#[derive(Debug, Clone, Deserialize)]
pub struct Signature {
    pub label: String,
    pub segments: Vec<String>,
}

// Embed the TOML file directly in the binary at compile time
const STANDARDS_TOML: &str = include_str!("../standards.toml");

/// Parse the standard definitions from the embedded TOML content
pub fn load_standards() -> Result<Standards> {
    toml::from_str(STANDARDS_TOML).context("Failed to parse embedded standards TOML file")
}

/// A glob that could not be compiled, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedPattern {
    pub pattern: String,
    pub reason: String,
}

/// The compiled, effective set of removal patterns.
///
/// Matching is case-sensitive shell-style globbing: `*` and `?` may cross
/// `/`, `**/` matches zero or more leading directories and `/**` matches
/// everything underneath.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<String>,
    set: GlobSet,
    rejected: Vec<RejectedPattern>,
}

impl PatternSet {
    /// Compile patterns, skipping duplicates and rejecting invalid globs
    /// individually. Only a failure to assemble the whole set is an error.
    pub fn compile<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut seen = HashSet::new();
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            if !seen.insert(pattern.to_string()) {
                continue;
            }
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                    accepted.push(pattern.to_string());
                }
                Err(err) => rejected.push(RejectedPattern {
                    pattern: pattern.to_string(),
                    reason: err.kind().to_string(),
                }),
            }
        }

        let set = builder
            .build()
            .context("Failed to build removal pattern set")?;

        Ok(PatternSet {
            patterns: accepted,
            set,
            rejected,
        })
    }

    /// Standard removal patterns followed by the user-supplied ones
    pub fn with_standard(standards: &Standards, user_patterns: &[String]) -> Result<Self> {
        Self::compile(standards.remove.patterns.iter().chain(user_patterns))
    }

    /// True if `path` matches any pattern directly or as a directory
    /// (with a trailing `/` appended).
    pub fn matches(&self, path: &str) -> bool {
        if self.set.is_empty() {
            return false;
        }
        if self.set.is_match(path) {
            return true;
        }
        if path.ends_with('/') {
            return false;
        }
        self.set.is_match(format!("{}/", path))
    }

    /// True if `path` matches as a directory only
    pub fn matches_dir(&self, path: &str) -> bool {
        let dir = path.trim_end_matches('/');
        !dir.is_empty() && self.set.is_match(format!("{}/", dir))
    }

    /// Accepted patterns in first-seen order
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn rejected(&self) -> &[RejectedPattern] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Convenience for single-pattern checks
pub fn path_matches(path: &str, pattern: &str) -> bool {
    PatternSet::compile([pattern])
        .map(|set| set.matches(path))
        .unwrap_or(false)
}
