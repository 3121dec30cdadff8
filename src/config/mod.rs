//! Configuration management for commitgate
//!
//! Settings are optional: every field has a default, and a repository only
//! needs a `commitgate.toml` (or `commitgate.yaml`) to change tool names,
//! helper locations or the subprocess timeout. See [`core`] for how the
//! sources are layered.

pub mod core;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure for commitgate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Upper bound for a single external tool invocation (seconds, 0 = unbounded)
    pub tool_timeout_secs: u64,

    /// Optional shell file sourced to discover local toggles
    pub local_file: String,

    /// Perl group checks
    pub perl: PerlConfig,

    /// Shell group checks
    pub shell: ShellConfig,

    /// Python group checks
    pub python: PythonConfig,
}

/// Perl helper configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerlConfig {
    /// Candidate locations of the compile-check helper, first hit wins
    pub compile_helpers: Vec<String>,

    /// Candidate locations of the tidy-check helper, first hit wins
    pub tidy_helpers: Vec<String>,

    /// Test helper module that must not be committed in use
    pub forbidden_module: String,

    /// Variable in the local file that enables `carton exec`
    pub carton_flag: String,
}

/// Shell linter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub linter: String,
    pub linter_args: Vec<String>,
}

/// Python formatter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PythonConfig {
    pub formatter: String,

    /// Arguments that put the formatter in check-only mode
    pub formatter_args: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            tool_timeout_secs: 300,
            local_file: ".commitgate.local".to_string(),
            perl: PerlConfig::default(),
            shell: ShellConfig::default(),
            python: PythonConfig::default(),
        }
    }
}

impl Default for PerlConfig {
    fn default() -> Self {
        Self {
            compile_helpers: vec![
                "script/compile-check".to_string(),
                "bin/compile-check".to_string(),
            ],
            tidy_helpers: vec![
                "script/tidy-check".to_string(),
                "bin/tidy-check".to_string(),
            ],
            forbidden_module: "Test::Focus".to_string(),
            carton_flag: "USE_CARTON".to_string(),
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            linter: "shellcheck".to_string(),
            linter_args: vec!["--".to_string()],
        }
    }
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            formatter: "black".to_string(),
            formatter_args: vec![
                "--check".to_string(),
                "--quiet".to_string(),
                "--".to_string(),
            ],
        }
    }
}

impl GateConfig {
    /// Timeout applied to each external tool, if any
    pub fn tool_timeout(&self) -> Option<Duration> {
        (self.tool_timeout_secs > 0).then(|| Duration::from_secs(self.tool_timeout_secs))
    }

    /// Resolve a configured path against the repository root, expanding `~/`
    pub fn resolve_path(repo_root: &Path, configured: &str) -> PathBuf {
        if let Some(rest) = configured.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        repo_root.join(configured)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.shell.linter.trim().is_empty() {
            anyhow::bail!("shell.linter cannot be empty");
        }
        if self.python.formatter.trim().is_empty() {
            anyhow::bail!("python.formatter cannot be empty");
        }
        if self.perl.forbidden_module.trim().is_empty() {
            anyhow::bail!("perl.forbidden_module cannot be empty");
        }
        Ok(())
    }
}
