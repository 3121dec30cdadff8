//! Staged change discovery
//!
//! Reads the difference between `HEAD` and the index. Deleted paths are kept
//! as records so callers can count them, but nothing downstream scans them.

use super::GitRepo;
use anyhow::{Context, Result};
use git2::{Status, StatusEntry, StatusOptions};
use serde::Serialize;
use std::fmt;

/// Kind of change staged for a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
    TypeChanged,
}

impl ChangeKind {
    fn from_status(status: Status) -> Option<Self> {
        // Order matters: a rename also reports the new side as modified
        if status.contains(Status::INDEX_DELETED) {
            Some(Self::Deleted)
        } else if status.contains(Status::INDEX_RENAMED) {
            Some(Self::Renamed)
        } else if status.contains(Status::INDEX_NEW) {
            Some(Self::Added)
        } else if status.contains(Status::INDEX_MODIFIED) {
            Some(Self::Modified)
        } else if status.contains(Status::INDEX_TYPECHANGE) {
            Some(Self::TypeChanged)
        } else {
            None
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Renamed => "renamed",
            Self::TypeChanged => "type changed",
        };
        f.write_str(name)
    }
}

/// One staged path and how it changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    /// Repository-relative path, `/`-separated
    pub path: String,
    pub kind: ChangeKind,
}

impl ChangeRecord {
    pub fn is_deletion(&self) -> bool {
        self.kind == ChangeKind::Deleted
    }
}

impl GitRepo {
    /// List every path that differs between the index and the last commit
    pub fn staged_changes(&self) -> Result<Vec<ChangeRecord>> {
        self.repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .context("No prior commit to compare the staged changes against")?;

        let mut opts = StatusOptions::new();
        opts.include_untracked(false)
            .include_ignored(false)
            .renames_head_to_index(true);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .context("Failed to get repository status")?;

        let mut records = Vec::new();
        for entry in statuses.iter() {
            let Some(kind) = ChangeKind::from_status(entry.status()) else {
                continue;
            };
            let Some(path) = staged_path(&entry, kind) else {
                tracing::warn!("Skipping staged entry without a usable path");
                continue;
            };
            tracing::trace!("staged {kind}: {path}");
            records.push(ChangeRecord { path, kind });
        }

        Ok(records)
    }
}

/// Renames are reported under their new name; everything else by entry path
fn staged_path(entry: &StatusEntry<'_>, kind: ChangeKind) -> Option<String> {
    if kind == ChangeKind::Renamed {
        if let Some(path) = entry
            .head_to_index()
            .and_then(|delta| delta.new_file().path())
        {
            return Some(path.to_string_lossy().into_owned());
        }
    }
    entry.path().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Repository, Signature};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn stage(repo: &Repository, paths: &[&str]) {
        let mut index = repo.index().unwrap();
        for path in paths {
            index.add_path(Path::new(path)).unwrap();
        }
        index.write().unwrap();
    }

    fn commit_all(repo: &Repository, message: &str) {
        let mut index = repo.index().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = Signature::now("Test", "test@example.com").unwrap();
        let parents: Vec<_> = repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok())
            .into_iter()
            .collect();
        let parent_refs: Vec<_> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap();
    }

    #[test]
    fn test_no_prior_commit_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::init(temp_dir.path()).unwrap();
        fs::write(temp_dir.path().join("a.txt"), "a\n").unwrap();
        stage(&repo, &["a.txt"]);

        let git = GitRepo::discover_from(temp_dir.path()).unwrap();
        let err = git.staged_changes().unwrap_err();
        assert!(err.to_string().contains("No prior commit"));
    }

    #[test]
    fn test_staged_changes_kinds() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let repo = Repository::init(root).unwrap();

        fs::write(root.join("keep.txt"), "keep\n").unwrap();
        fs::write(root.join("gone.txt"), "gone\n").unwrap();
        fs::write(root.join("untouched.txt"), "same\n").unwrap();
        stage(&repo, &["keep.txt", "gone.txt", "untouched.txt"]);
        commit_all(&repo, "initial");

        fs::write(root.join("keep.txt"), "changed\n").unwrap();
        fs::write(root.join("new.txt"), "new\n").unwrap();
        fs::write(root.join("unstaged.txt"), "not staged\n").unwrap();
        stage(&repo, &["keep.txt", "new.txt"]);

        fs::remove_file(root.join("gone.txt")).unwrap();
        let mut index = repo.index().unwrap();
        index.remove_path(Path::new("gone.txt")).unwrap();
        index.write().unwrap();

        let git = GitRepo::discover_from(root).unwrap();
        let records = git.staged_changes().unwrap();

        assert_eq!(
            records,
            vec![
                ChangeRecord { path: "gone.txt".into(), kind: ChangeKind::Deleted },
                ChangeRecord { path: "keep.txt".into(), kind: ChangeKind::Modified },
                ChangeRecord { path: "new.txt".into(), kind: ChangeKind::Added },
            ]
        );
        assert!(records[0].is_deletion());
    }
}
