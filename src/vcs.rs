//! Version-control capability interface and its `git` command-line backend.

use crate::error::PurgeError;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;

/// An object reachable from some ref, with the path it was reached through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub id: String,
    pub path: Option<String>,
}

/// Type and size of an object in the object database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub id: String,
    pub kind: String,
    pub size: u64,
}

impl ObjectInfo {
    pub fn is_blob(&self) -> bool {
        self.kind == "blob"
    }
}

/// The narrow set of version-control operations a purge needs.
///
/// Every mutation goes through this interface; nothing else touches the
/// index or the object database.
pub trait Vcs {
    /// Root of the working tree
    fn root(&self) -> &Path;

    /// True if there are uncommitted changes (staged, unstaged or untracked)
    fn is_dirty(&self) -> Result<bool>;

    /// All currently tracked files, relative to the root, `/`-separated
    fn tracked_files(&self) -> Result<Vec<String>>;

    /// Stop tracking `paths` while keeping them on disk
    fn untrack(&mut self, paths: &[String]) -> Result<()>;

    /// Every object reachable from any ref
    fn list_objects(&self) -> Result<Vec<ObjectRef>>;

    /// Type and size for each of `ids` that exists
    fn object_info(&self, ids: &[String]) -> Result<Vec<ObjectInfo>>;

    /// Whether a history-rewrite engine is installed
    fn has_history_rewriter(&self) -> bool;

    /// Drop every path matching one of `globs` from all of history
    fn rewrite_history(&mut self, globs: &[String]) -> Result<()>;
}

/// `Vcs` backed by the `git` executable
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    /// Find the repository containing `start` via `git rev-parse --show-toplevel`
    pub fn discover(start: &Path) -> Result<Self> {
        let output = run_git(start, &["rev-parse", "--show-toplevel"])?;
        let root = output.trim();
        if root.is_empty() {
            return Err(PurgeError::Command {
                command: "git rev-parse --show-toplevel".to_string(),
                stderr: "Unable to detect repository root".to_string(),
            }
            .into());
        }
        Ok(GitCli {
            root: PathBuf::from(root),
        })
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        run_git(&self.root, args)
    }
}

impl Vcs for GitCli {
    fn root(&self) -> &Path {
        &self.root
    }

    fn is_dirty(&self) -> Result<bool> {
        let status = self.git(&["status", "--porcelain"])?;
        Ok(!status.trim().is_empty())
    }

    fn tracked_files(&self) -> Result<Vec<String>> {
        let listing = self.git(&["ls-files", "-z"])?;
        Ok(split_nul(&listing))
    }

    fn untrack(&mut self, paths: &[String]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = vec!["rm", "-r", "--cached", "--quiet", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.git(&args)?;
        Ok(())
    }

    fn list_objects(&self) -> Result<Vec<ObjectRef>> {
        let listing = self.git(&["rev-list", "--objects", "--all"])?;
        Ok(parse_rev_list(&listing))
    }

    fn object_info(&self, ids: &[String]) -> Result<Vec<ObjectInfo>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        // One pass over the whole object database, filtered to the wanted ids.
        // Avoids feeding ids through stdin while also draining stdout.
        let listing = self.git(&[
            "cat-file",
            "--batch-all-objects",
            "--batch-check=%(objectname) %(objecttype) %(objectsize)",
        ])?;
        let wanted: std::collections::HashSet<&str> = ids.iter().map(String::as_str).collect();
        Ok(parse_batch_check(&listing)
            .into_iter()
            .filter(|info| wanted.contains(info.id.as_str()))
            .collect())
    }

    fn has_history_rewriter(&self) -> bool {
        self.git(&["filter-repo", "--version"]).is_ok()
    }

    fn rewrite_history(&mut self, globs: &[String]) -> Result<()> {
        let mut args = vec!["filter-repo"];
        for glob in globs {
            args.push("--path-glob");
            args.push(glob);
        }
        args.push("--invert-paths");
        self.git(&args)?;
        Ok(())
    }
}

/// Run `git` in `dir`, returning stdout or a `PurgeError::Command` carrying
/// git's own error text.
fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let command = format!("git {}", args.join(" "));
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|err| PurgeError::Command {
            command: command.clone(),
            stderr: err.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stderr = if stderr.is_empty() {
            output.status.to_string()
        } else {
            stderr
        };
        return Err(PurgeError::Command { command, stderr }.into());
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Split NUL-terminated `ls-files -z` output
pub fn split_nul(listing: &str) -> Vec<String> {
    listing
        .split('\0')
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

/// Parse `rev-list --objects` lines: `<id>` or `<id> <path>`. Paths may
/// contain spaces.
pub fn parse_rev_list(listing: &str) -> Vec<ObjectRef> {
    listing
        .lines()
        .filter_map(|line| {
            let line = line.trim_end();
            let mut parts = line.splitn(2, ' ');
            let id = parts.next().filter(|id| !id.is_empty())?;
            let path = parts.next().filter(|p| !p.is_empty()).map(String::from);
            Some(ObjectRef {
                id: id.to_string(),
                path,
            })
        })
        .collect()
}

/// Parse `cat-file --batch-check` lines of `<id> <type> <size>`, skipping
/// anything malformed (e.g. `<id> missing`).
pub fn parse_batch_check(listing: &str) -> Vec<ObjectInfo> {
    listing
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != 3 {
                return None;
            }
            let size = parts[2].parse().ok()?;
            Some(ObjectInfo {
                id: parts[0].to_string(),
                kind: parts[1].to_string(),
                size,
            })
        })
        .collect()
}
