//! In-memory version-control backend and scripted prompt for tests.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use artifact_purge::error::PurgeError;
use artifact_purge::{ObjectInfo, ObjectRef, Prompt, Vcs};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

pub fn paths(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A repository that lives entirely in memory and records every mutation
#[derive(Debug, Default)]
pub struct MemoryVcs {
    pub root: PathBuf,
    pub tracked: Vec<String>,
    pub dirty: bool,
    pub objects: Vec<ObjectRef>,
    pub infos: Vec<ObjectInfo>,
    pub has_rewriter: bool,
    pub fail_untrack: Option<String>,
    pub untrack_calls: Vec<Vec<String>>,
    pub rewrite_calls: Vec<Vec<String>>,
}

impl MemoryVcs {
    pub fn new(root: &Path, tracked: &[&str]) -> Self {
        MemoryVcs {
            root: root.to_path_buf(),
            tracked: paths(tracked),
            ..MemoryVcs::default()
        }
    }

    pub fn with_blob(mut self, id: &str, size: u64, path: &str) -> Self {
        self.objects.push(ObjectRef {
            id: id.to_string(),
            path: Some(path.to_string()),
        });
        self.infos.push(ObjectInfo {
            id: id.to_string(),
            kind: "blob".to_string(),
            size,
        });
        self
    }

    /// Number of index or history mutations performed
    pub fn mutations(&self) -> usize {
        self.untrack_calls.len() + self.rewrite_calls.len()
    }
}

impl Vcs for MemoryVcs {
    fn root(&self) -> &Path {
        &self.root
    }

    fn is_dirty(&self) -> Result<bool> {
        Ok(self.dirty)
    }

    fn tracked_files(&self) -> Result<Vec<String>> {
        Ok(self.tracked.clone())
    }

    fn untrack(&mut self, paths: &[String]) -> Result<()> {
        if let Some(stderr) = &self.fail_untrack {
            return Err(PurgeError::Command {
                command: "git rm -r --cached".to_string(),
                stderr: stderr.clone(),
            }
            .into());
        }
        self.untrack_calls.push(paths.to_vec());
        self.tracked.retain(|tracked| {
            !paths
                .iter()
                .any(|p| tracked == p || tracked.starts_with(&format!("{}/", p)))
        });
        Ok(())
    }

    fn list_objects(&self) -> Result<Vec<ObjectRef>> {
        Ok(self.objects.clone())
    }

    fn object_info(&self, ids: &[String]) -> Result<Vec<ObjectInfo>> {
        Ok(self
            .infos
            .iter()
            .filter(|info| ids.contains(&info.id))
            .cloned()
            .collect())
    }

    fn has_history_rewriter(&self) -> bool {
        self.has_rewriter
    }

    fn rewrite_history(&mut self, globs: &[String]) -> Result<()> {
        if !self.has_rewriter {
            return Err(anyhow!("git: 'filter-repo' is not a git command"));
        }
        self.rewrite_calls.push(globs.to_vec());
        Ok(())
    }
}

/// Answers prompts from a fixed script and records the questions
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    pub answers: VecDeque<String>,
    pub asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[&str]) -> Self {
        ScriptedPrompt {
            answers: answers.iter().map(|a| format!("{}\n", a)).collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> Result<String> {
        self.asked.push(question.to_string());
        // An exhausted script behaves like stdin at EOF
        Ok(self.answers.pop_front().unwrap_or_default())
    }
}
