//! Oversized blob detection across the full object history.

use crate::output;
use crate::vcs::Vcs;
use std::collections::{HashMap, HashSet};

/// Default reporting threshold: 50 MiB
pub const DEFAULT_THRESHOLD_BYTES: u64 = 50 * 1024 * 1024;

/// Placeholder for blobs reachable without a recorded path
pub const UNKNOWN_PATH: &str = "(unknown)";

/// A blob at or above the size threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LargeBlob {
    pub id: String,
    pub size: u64,
    pub path: String,
}

/// Find every blob of at least `threshold` bytes reachable from any ref.
///
/// Read-only and best-effort: if objects cannot be enumerated or inspected
/// (shallow clone, permissions) a warning is logged and nothing is reported.
pub fn find_large_blobs<V: Vcs + ?Sized>(vcs: &V, threshold: u64) -> Vec<LargeBlob> {
    let objects = match vcs.list_objects() {
        Ok(objects) => objects,
        Err(err) => {
            output::warn(&format!("Unable to list objects: {:#}", err));
            return Vec::new();
        }
    };
    if objects.is_empty() {
        return Vec::new();
    }

    let mut ids: Vec<String> = Vec::with_capacity(objects.len());
    let mut seen = HashSet::new();
    for object in &objects {
        if seen.insert(object.id.as_str()) {
            ids.push(object.id.clone());
        }
    }

    let infos = match vcs.object_info(&ids) {
        Ok(infos) => infos,
        Err(err) => {
            output::warn(&format!("Unable to inspect objects: {:#}", err));
            return Vec::new();
        }
    };

    let blob_sizes: HashMap<&str, u64> = infos
        .iter()
        .filter(|info| info.is_blob())
        .map(|info| (info.id.as_str(), info.size))
        .collect();

    // Enumeration order, first occurrence wins, so output is stable per run
    let mut reported = HashSet::new();
    let mut blobs = Vec::new();
    for object in &objects {
        let Some(&size) = blob_sizes.get(object.id.as_str()) else {
            continue;
        };
        if size < threshold || !reported.insert(object.id.as_str()) {
            continue;
        }
        blobs.push(LargeBlob {
            id: object.id.clone(),
            size,
            path: object
                .path
                .clone()
                .unwrap_or_else(|| UNKNOWN_PATH.to_string()),
        });
    }
    blobs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::{ObjectInfo, ObjectRef};
    use anyhow::{anyhow, Result};
    use std::path::Path;

    #[derive(Default)]
    struct History {
        objects: Vec<ObjectRef>,
        infos: Vec<ObjectInfo>,
        fail_listing: bool,
    }

    impl History {
        fn object(mut self, id: &str, kind: &str, size: u64, path: Option<&str>) -> Self {
            self.objects.push(ObjectRef {
                id: id.to_string(),
                path: path.map(String::from),
            });
            self.infos.push(ObjectInfo {
                id: id.to_string(),
                kind: kind.to_string(),
                size,
            });
            self
        }
    }

    impl Vcs for History {
        fn root(&self) -> &Path {
            Path::new(".")
        }
        fn is_dirty(&self) -> Result<bool> {
            Ok(false)
        }
        fn tracked_files(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
        fn untrack(&mut self, _paths: &[String]) -> Result<()> {
            Ok(())
        }
        fn list_objects(&self) -> Result<Vec<ObjectRef>> {
            if self.fail_listing {
                return Err(anyhow!("fatal: shallow repository"));
            }
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
            false
        }
        fn rewrite_history(&mut self, _globs: &[String]) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let history = History::default()
            .object("small", "blob", 99, Some("a.txt"))
            .object("exact", "blob", 100, Some("b.bin"))
            .object("big", "blob", 500, Some("c.bin"));
        let blobs = find_large_blobs(&history, 100);
        let ids: Vec<&str> = blobs.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["exact", "big"]);
        assert_eq!(blobs[1].size, 500);
        assert_eq!(blobs[1].path, "c.bin");
    }

    #[test]
    fn test_each_blob_reported_once() {
        let mut history = History::default().object("big", "blob", 1000, Some("old/name.bin"));
        history.objects.push(ObjectRef {
            id: "big".into(),
            path: Some("new/name.bin".into()),
        });
        let blobs = find_large_blobs(&history, 10);
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].path, "old/name.bin");
        assert_eq!(blobs[0].size, 1000);
    }

    #[test]
    fn test_non_blobs_and_missing_paths() {
        let history = History::default()
            .object("tree1", "tree", 10_000, Some("src"))
            .object("orphan", "blob", 10_000, None);
        let blobs = find_large_blobs(&history, 1);
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].id, "orphan");
        assert_eq!(blobs[0].path, UNKNOWN_PATH);
    }

    #[test]
    fn test_listing_failure_yields_no_results() {
        let history = History {
            fail_listing: true,
            ..History::default()
        }
        .object("big", "blob", u64::MAX, Some("x"));
        assert!(find_large_blobs(&history, 1).is_empty());
    }

    #[test]
    fn test_default_threshold() {
        assert_eq!(DEFAULT_THRESHOLD_BYTES, 52_428_800);
    }
}
