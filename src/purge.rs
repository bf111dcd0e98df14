//! The purge run: gate, sync ignore rules, untrack artifacts, report, verify.

use crate::blobs::{find_large_blobs, LargeBlob, DEFAULT_THRESHOLD_BYTES};
use crate::derive::derive_removals;
use crate::error::PurgeError;
use crate::gitignore::update_ignore_file;
use crate::output::{log_line, warn};
use crate::patterns::{PatternSet, Standards};
use crate::sources::{parse_pattern_list, parse_tree_dump, read_optional_text};
use crate::vcs::Vcs;
use crate::verify::{check_signatures, log_verification, Verification};

use anyhow::{Context, Result};
use humansize::{format_size, BINARY};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Literal token the operator must type before destructive steps
pub const CONFIRMATION_TOKEN: &str = "APPLY";

/// Setting this variable to `1` skips interactive confirmation
pub const ASSUME_YES_ENV: &str = "ARTIFACT_PURGE_ASSUME_YES";

/// Paths per `git rm --cached` invocation, to stay under command-length limits
pub const REMOVAL_BATCH_SIZE: usize = 200;

pub const MAX_DIAGNOSTIC_LOGS: usize = 2;

pub const IGNORE_FILE: &str = ".gitignore";

/// Options controlling a purge run
#[derive(Debug, Clone)]
pub struct PurgeOptions {
    /// Report only; never write `.gitignore`, untrack or rewrite history
    pub dry_run: bool,
    pub allow_dirty: bool,
    pub history_rewrite: bool,
    /// Skip the confirmation prompt
    pub assume_yes: bool,
    /// Removal pattern list, relative to the repository root unless absolute
    pub rm_list: PathBuf,
    /// Directory-tree dump, relative to the repository root unless absolute
    pub tree: PathBuf,
    /// Diagnostic logs, only checked for presence
    pub diagnostics: Vec<PathBuf>,
    pub large_blob_threshold: u64,
}

impl Default for PurgeOptions {
    fn default() -> Self {
        PurgeOptions {
            dry_run: false,
            allow_dirty: false,
            history_rewrite: false,
            assume_yes: false,
            rm_list: PathBuf::from("rm.txt"),
            tree: PathBuf::from("tree.txt"),
            diagnostics: vec![
                PathBuf::from("current state of the repo.txt"),
                PathBuf::from("new 2.txt"),
            ],
            large_blob_threshold: DEFAULT_THRESHOLD_BYTES,
        }
    }
}

/// What a completed run did and found
#[derive(Debug, Clone, Default)]
pub struct PurgeSummary {
    pub ignore_file_changed: bool,
    pub candidates: Vec<String>,
    /// True once the candidates were actually untracked
    pub untracked: bool,
    pub large_blobs: Vec<LargeBlob>,
    pub history_rewritten: bool,
    pub verification: Option<Verification>,
}

/// Source of operator answers for confirmation prompts
pub trait Prompt {
    fn ask(&mut self, question: &str) -> Result<String>;
}

/// Prompt on stdout, answer from stdin
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, question: &str) -> Result<String> {
        print!("{}: ", question);
        io::stdout().flush().context("Failed to flush stdout")?;
        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("Failed to read confirmation")?;
        Ok(answer)
    }
}

/// Require the operator to type the confirmation token for `action`
fn confirm<P: Prompt + ?Sized>(prompt: &mut P, assume_yes: bool, action: &str) -> Result<()> {
    if assume_yes {
        log_line(&format!(
            "{}=1 set; skipping confirmation.",
            ASSUME_YES_ENV
        ));
        return Ok(());
    }
    let answer = prompt.ask(&format!(
        "Type {} to proceed with {}",
        CONFIRMATION_TOKEN, action
    ))?;
    if answer.trim() != CONFIRMATION_TOKEN {
        return Err(PurgeError::ConfirmationDenied {
            action: action.to_string(),
        }
        .into());
    }
    Ok(())
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Read an optional input, downgrading read failures to warnings
fn read_input(root: &Path, path: &Path) -> Option<String> {
    let full = resolve(root, path);
    match read_optional_text(&full) {
        Ok(text) => text,
        Err(err) => {
            warn(&format!("{:#}; treating it as absent.", err));
            None
        }
    }
}

/// Execute a full purge run against `vcs`.
///
/// Fatal conditions (dirty tree, missing history-rewrite tool, failed git
/// command, denied confirmation) abort immediately with a `PurgeError`.
pub fn run<V, P>(
    vcs: &mut V,
    prompt: &mut P,
    standards: &Standards,
    options: &PurgeOptions,
) -> Result<PurgeSummary>
where
    V: Vcs + ?Sized,
    P: Prompt + ?Sized,
{
    let root = vcs.root().to_path_buf();
    log_line(&format!("Repo root: {}", root.display()));

    // Cleanliness gate: nothing is touched on a dirty tree without override
    if vcs.is_dirty()? {
        if !options.allow_dirty {
            log_line("Working tree is dirty.");
            log_line("Commit or stash changes, or re-run with --allow-dirty.");
            return Err(PurgeError::DirtyWorkingTree.into());
        }
        warn("Working tree is dirty; proceeding due to --allow-dirty.");
    }

    if options.history_rewrite && !vcs.has_history_rewriter() {
        return Err(PurgeError::CapabilityMissing {
            tool: "git-filter-repo".to_string(),
            remedy: "Install with: python -m pip install git-filter-repo".to_string(),
        }
        .into());
    }

    let rm_text = read_input(&root, &options.rm_list);
    let tree_text = read_input(&root, &options.tree);

    let user_patterns = rm_text.as_deref().map(parse_pattern_list).unwrap_or_default();
    let tree_paths = tree_text.as_deref().map(parse_tree_dump).unwrap_or_default();

    match &rm_text {
        Some(_) => log_line(&format!(
            "{}: {} removal patterns.",
            options.rm_list.display(),
            user_patterns.len()
        )),
        None => log_line(&format!(
            "{} not found; using standard remove patterns only.",
            options.rm_list.display()
        )),
    }
    match &tree_text {
        Some(_) => log_line(&format!(
            "{}: {} tree entries.",
            options.tree.display(),
            tree_paths.len()
        )),
        None => log_line(&format!(
            "{} not found; using tracked file scan only.",
            options.tree.display()
        )),
    }

    if options.diagnostics.len() > MAX_DIAGNOSTIC_LOGS {
        warn(&format!(
            "Only the first {} diagnostic logs are checked.",
            MAX_DIAGNOSTIC_LOGS
        ));
    }
    for diagnostic in options.diagnostics.iter().take(MAX_DIAGNOSTIC_LOGS) {
        if read_input(&root, diagnostic).is_some() {
            log_line(&format!(
                "Optional diagnostic log detected: {}",
                diagnostic.display()
            ));
        }
    }

    let mut summary = PurgeSummary::default();

    // Ignore rules
    let ignore_path = root.join(IGNORE_FILE);
    summary.ignore_file_changed =
        update_ignore_file(&ignore_path, &standards.ignore.rules, !options.dry_run)?;
    match (summary.ignore_file_changed, options.dry_run) {
        (true, true) => log_line("Dry-run enabled; .gitignore managed block would be updated."),
        (true, false) => log_line(".gitignore updated with managed block."),
        (false, _) => log_line(".gitignore managed block already up to date."),
    }

    // Removal set
    let patterns = PatternSet::with_standard(standards, &user_patterns)?;
    for rejected in patterns.rejected() {
        warn(&format!(
            "Ignoring invalid pattern '{}': {}",
            rejected.pattern, rejected.reason
        ));
    }
    let tracked = vcs.tracked_files()?;
    summary.candidates = derive_removals(&tracked, &patterns, &tree_paths);

    if summary.candidates.is_empty() {
        log_line("No tracked build artifacts detected for removal.");
    } else {
        log_line(&format!(
            "Tracked artifacts to untrack: {}",
            summary.candidates.len()
        ));
        for path in &summary.candidates {
            log_line(&format!("  - {}", path));
        }

        if options.dry_run {
            log_line("Dry-run enabled; not running git rm --cached.");
        } else {
            confirm(prompt, options.assume_yes, "removing tracked build artifacts")?;
            for batch in summary.candidates.chunks(REMOVAL_BATCH_SIZE) {
                vcs.untrack(batch)?;
            }
            summary.untracked = true;
            log_line(&format!(
                "Untracked {} paths; commit the result to record the removal.",
                summary.candidates.len()
            ));
        }
    }

    // Large objects
    summary.large_blobs = find_large_blobs(&*vcs, options.large_blob_threshold);
    if summary.large_blobs.is_empty() {
        log_line("No large blobs detected above threshold.");
    } else {
        log_line("Large blobs detected (history rewrite may be needed):");
        for blob in &summary.large_blobs {
            log_line(&format!(
                "  - {} ({}, {})",
                blob.path,
                format_size(blob.size, BINARY),
                blob.id
            ));
        }
    }

    // History rewrite
    if options.history_rewrite {
        let globs = patterns.patterns().to_vec();
        if options.dry_run {
            log_line("Dry-run enabled; skipping history rewrite.");
            for glob in &globs {
                log_line(&format!("  would drop: {}", glob));
            }
        } else {
            confirm(prompt, options.assume_yes, "history rewrite")?;
            log_line("Running git filter-repo to purge historical artifacts...");
            vcs.rewrite_history(&globs)?;
            summary.history_rewritten = true;
            log_line("History rewrite complete.");
            log_line("Next steps:");
            log_line("  git push --force-with-lease --all");
            log_line("  git push --force-with-lease --tags");
            log_line("Warn collaborators to re-clone or hard reset.");
        }
    }

    // Verification is diagnostic only
    match vcs.tracked_files() {
        Ok(tracked) => {
            let verification = check_signatures(&tracked, &standards.signatures);
            log_verification(&verification);
            summary.verification = Some(verification);
        }
        Err(err) => warn(&format!("Unable to verify tracked files: {:#}", err)),
    }

    log_line("Done.");
    Ok(summary)
}
