//! artifact-purge - Untrack Committed Build Artifacts
//!
//! artifact-purge finds build outputs and dependency caches that were committed to a git
//! repository, removes them from the index (keeping them on disk), and installs a managed
//! `.gitignore` block so they are not added again. Optionally it rewrites history with
//! `git filter-repo` to drop them from every commit.
//!
//! ## Architecture
//!
//! - `patterns`: standard definitions (embedded `standards.toml`) and glob matching
//! - `sources`: tolerant parsers for the free-text removal list and tree dump
//! - `derive`: reconciles patterns, tree paths and the tracked listing into the removal set
//! - `gitignore`: managed block merge that never touches user-owned lines
//! - `blobs`: oversized blob report across all refs
//! - `verify`: post-purge signature checks
//! - `vcs`: the narrow version-control interface and its `git` backend
//! - `purge`: the run itself, tying the above together

pub mod blobs;
pub mod derive;
pub mod error;
pub mod gitignore;
pub mod output;
pub mod patterns;
pub mod purge;
pub mod sources;
pub mod vcs;
pub mod verify;

// Re-export commonly used items
pub use blobs::{find_large_blobs, LargeBlob, DEFAULT_THRESHOLD_BYTES};
pub use derive::derive_removals;
pub use error::PurgeError;
pub use gitignore::{sync_managed_block, MANAGED_BLOCK_BEGIN, MANAGED_BLOCK_END};
pub use patterns::{load_standards, PatternSet, Signature, Standards};
pub use purge::{run, Prompt, PurgeOptions, PurgeSummary, StdinPrompt};
pub use sources::{parse_pattern_list, parse_tree_dump};
pub use vcs::{GitCli, ObjectInfo, ObjectRef, Vcs};
pub use verify::{check_signatures, Verification};
