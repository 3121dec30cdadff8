//! Repository-level exclusion list
//!
//! `.commitgate-ignore` holds one repository-relative path per line. Matching
//! is exact; there is no glob support.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;

/// File name of the exclusion list, relative to the repository root
pub const IGNORE_FILE: &str = ".commitgate-ignore";

/// Paths excluded from every check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    paths: BTreeSet<String>,
}

impl IgnoreSet {
    /// Load the exclusion list from the repository root; a missing file means no exclusions
    pub fn load(repo_root: &Path) -> Result<Self> {
        let path = repo_root.join(IGNORE_FILE);
        if !path.is_file() {
            tracing::debug!("No {} found, nothing excluded", IGNORE_FILE);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let set = Self::parse(&content);
        tracing::debug!("Loaded {} ignored path(s) from {}", set.len(), IGNORE_FILE);
        Ok(set)
    }

    pub fn parse(content: &str) -> Self {
        let paths = content
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { paths }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_exact_paths() {
        let set = IgnoreSet::parse("vendor/lib.pl\n\nscripts/old.sh\r\nlast-without-newline");
        assert_eq!(set.len(), 3);
        assert!(set.contains("vendor/lib.pl"));
        assert!(set.contains("scripts/old.sh"));
        assert!(set.contains("last-without-newline"));
    }

    #[test]
    fn test_no_glob_matching() {
        let set = IgnoreSet::parse("*.pl\nvendor/\n");
        assert!(!set.contains("lib/Foo.pl"));
        assert!(!set.contains("vendor/lib.pl"));
        assert!(set.contains("*.pl"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let set = IgnoreSet::load(temp_dir.path()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_load_from_repo_root() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(IGNORE_FILE), "a.txt\nb/c.sh\n").unwrap();
        let set = IgnoreSet::load(temp_dir.path()).unwrap();
        assert!(set.contains("a.txt"));
        assert!(set.contains("b/c.sh"));
        assert!(!set.contains("b"));
    }
}
