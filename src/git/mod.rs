//! Git integration layer for commitgate
//!
//! This module wraps git2 for the few repository operations the gate needs:
//! locating the working tree, reading the staged changes and managing the
//! pre-commit hook file.

pub mod status;

use anyhow::{Context, Result};
use git2::Repository;
use std::path::Path;

pub use status::{ChangeKind, ChangeRecord};

/// Marker line written into hooks installed by commitgate
pub const HOOK_MARKER: &str = "# installed by commitgate";

/// Git repository handle
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Discover and open a Git repository from current directory
    pub fn discover() -> Result<Self> {
        Self::discover_from(".")
    }

    /// Discover a Git repository starting at `path` and walking upwards
    pub fn discover_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::discover(path)
            .with_context(|| format!("No Git repository found at {}", path.display()))?;

        Ok(Self { repo })
    }

    /// Working tree root; bare repositories have nothing to validate
    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .context("Repository has no working directory")
    }

    /// Path to the `.git` directory
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    /// Install a git hook, refusing to replace a hook we did not write
    pub fn install_hook(&self, hook_name: &str, hook_content: &str, force: bool) -> Result<()> {
        let hooks_dir = self.repo.path().join("hooks");
        let hook_path = hooks_dir.join(hook_name);

        if hook_path.exists() && !force && !self.hook_is_ours(hook_name) {
            anyhow::bail!(
                "A {} hook already exists at {}; use --force to replace it",
                hook_name,
                hook_path.display()
            );
        }

        std::fs::create_dir_all(&hooks_dir).context("Failed to create hooks directory")?;
        std::fs::write(&hook_path, hook_content).context("Failed to write hook file")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&hook_path)
                .context("Failed to get hook file metadata")?
                .permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&hook_path, perms)
                .context("Failed to set hook file permissions")?;
        }

        Ok(())
    }

    /// Remove a git hook previously installed by commitgate
    ///
    /// Returns `false` when there was nothing of ours to remove.
    pub fn remove_hook(&self, hook_name: &str) -> Result<bool> {
        let hook_path = self.repo.path().join("hooks").join(hook_name);

        if !hook_path.exists() || !self.hook_is_ours(hook_name) {
            return Ok(false);
        }

        std::fs::remove_file(&hook_path).context("Failed to remove hook file")?;
        Ok(true)
    }

    /// Check whether the named hook carries our marker line
    pub fn hook_is_ours(&self, hook_name: &str) -> bool {
        let hook_path = self.repo.path().join("hooks").join(hook_name);
        std::fs::read_to_string(hook_path)
            .map(|content| content.lines().any(|line| line == HOOK_MARKER))
            .unwrap_or(false)
    }
}
