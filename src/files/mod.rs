//! Staged file model
//!
//! Turns the staged change records into the working set the checks run
//! against: deletions are dropped (and counted), ignored paths are removed,
//! and every remaining path is classified into a [`FileGroup`].

pub mod classify;
pub mod ignore;

use crate::git::ChangeRecord;
use serde::Serialize;
use std::fmt;
use std::path::Path;

pub use classify::classify;
pub use ignore::{IGNORE_FILE, IgnoreSet};

/// Validator group a staged file is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileGroup {
    Perl,
    Shell,
    Python,
    Unclassified,
}

impl fmt::Display for FileGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Perl => "perl",
            Self::Shell => "shell",
            Self::Python => "python",
            Self::Unclassified => "unclassified",
        };
        f.write_str(name)
    }
}

/// A staged, non-deleted path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedFile {
    /// Repository-relative path
    pub path: String,
    /// True only for regular files; symlinks and special files are not scanned
    pub exists_on_disk: bool,
    pub group: FileGroup,
}

/// The filtered, classified files of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingSet {
    files: Vec<StagedFile>,
    /// Deleted paths, reported but never checked
    pub deleted: usize,
    /// Paths removed by the ignore list
    pub ignored: usize,
}

impl WorkingSet {
    pub fn build(repo_root: &Path, records: &[ChangeRecord], ignore: &IgnoreSet) -> Self {
        let mut set = Self::default();

        for record in records {
            if record.is_deletion() {
                set.deleted += 1;
                continue;
            }
            if ignore.contains(&record.path) {
                tracing::debug!("{} is listed in {}, skipping", record.path, IGNORE_FILE);
                set.ignored += 1;
                continue;
            }
            set.files.push(classify(repo_root, &record.path));
        }

        set
    }

    /// Every staged file that is a regular file on disk
    pub fn regular_files(&self) -> impl Iterator<Item = &StagedFile> {
        self.files.iter().filter(|file| file.exists_on_disk)
    }

    /// Regular files routed to `group`
    pub fn group(&self, group: FileGroup) -> Vec<&StagedFile> {
        self.regular_files().filter(|file| file.group == group).collect()
    }

    /// Staged paths that are not regular files (symlinks, special files)
    pub fn not_regular(&self) -> usize {
        self.files.iter().filter(|file| !file.exists_on_disk).count()
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::ChangeKind;
    use tempfile::TempDir;

    fn record(path: &str, kind: ChangeKind) -> ChangeRecord {
        ChangeRecord {
            path: path.to_string(),
            kind,
        }
    }

    #[test]
    fn test_build_drops_deleted_and_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::write(root.join("keep.pl"), "1;\n").unwrap();
        std::fs::write(root.join("skip.pl"), "1;\n").unwrap();
        std::fs::write(root.join("run"), "# -*- sh -*-\nls\n").unwrap();

        let records = vec![
            record("keep.pl", ChangeKind::Modified),
            record("skip.pl", ChangeKind::Added),
            record("old.pl", ChangeKind::Deleted),
            record("run", ChangeKind::Renamed),
        ];
        let ignore = IgnoreSet::parse("skip.pl\n");

        let set = WorkingSet::build(root, &records, &ignore);

        assert_eq!(set.deleted, 1);
        assert_eq!(set.ignored, 1);
        let paths: Vec<_> = set.files().iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["keep.pl", "run"]);
        assert_eq!(set.group(FileGroup::Perl).len(), 1);
        assert_eq!(set.group(FileGroup::Shell).len(), 1);
        assert!(set.group(FileGroup::Python).is_empty());
    }

    #[test]
    fn test_deleted_path_is_never_classified() {
        let temp_dir = TempDir::new().unwrap();
        // Even if something reappears on disk under a deleted path
        std::fs::write(temp_dir.path().join("ghost.pl"), "1;\n").unwrap();

        let records = vec![record("ghost.pl", ChangeKind::Deleted)];
        let set = WorkingSet::build(temp_dir.path(), &records, &IgnoreSet::default());

        assert!(set.is_empty());
        assert_eq!(set.deleted, 1);
    }

    #[test]
    fn test_missing_files_are_not_regular() {
        let temp_dir = TempDir::new().unwrap();
        let records = vec![record("vanished.txt", ChangeKind::Added)];
        let set = WorkingSet::build(temp_dir.path(), &records, &IgnoreSet::default());

        assert_eq!(set.not_regular(), 1);
        assert_eq!(set.regular_files().count(), 0);
    }
}
