//! Tool discovery
//!
//! Perl helpers are repository scripts probed at a short list of candidate
//! locations; the shell linter and Python formatter are looked up on `PATH`.
//! A local shell file may switch the compile helper to run under
//! `carton exec`.

use super::{Tool, ToolCommand};
use crate::config::GateConfig;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;

lazy_static! {
    static ref SHELL_IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Finds an invocable command for an external tool
pub trait ToolLocator {
    /// `None` means the tool is unavailable and its check is skipped
    fn locate(&self, tool: Tool) -> Option<ToolCommand>;
}

/// Locator backed by the real filesystem and `PATH`
pub struct SystemLocator {
    repo_root: PathBuf,
    config: GateConfig,
    carton: Option<PathBuf>,
}

impl SystemLocator {
    pub fn new(repo_root: &Path, config: &GateConfig) -> Self {
        let carton = if carton_enabled(repo_root, config) {
            match which::which("carton") {
                Ok(path) => Some(path),
                Err(_) => {
                    tracing::warn!("Carton execution requested but carton is not on PATH");
                    None
                }
            }
        } else {
            None
        };

        Self {
            repo_root: repo_root.to_path_buf(),
            config: config.clone(),
            carton,
        }
    }

    fn first_helper(&self, candidates: &[String]) -> Option<PathBuf> {
        candidates
            .iter()
            .map(|candidate| GateConfig::resolve_path(&self.repo_root, candidate))
            .find(|path| {
                let found = is_executable(path);
                tracing::trace!("probing {}: {}", path.display(), found);
                found
            })
    }

    fn on_path(program: &str) -> Option<PathBuf> {
        match which::which(program) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::debug!("{program} not found on PATH: {e}");
                None
            }
        }
    }
}

impl ToolLocator for SystemLocator {
    fn locate(&self, tool: Tool) -> Option<ToolCommand> {
        let command = match tool {
            Tool::PerlCompile => {
                let helper = self.first_helper(&self.config.perl.compile_helpers)?;
                match &self.carton {
                    Some(carton) => ToolCommand::new(carton)
                        .with_args(["exec", "--"])
                        .with_args([helper.display().to_string()]),
                    None => ToolCommand::new(helper),
                }
            }
            Tool::PerlTidy => ToolCommand::new(self.first_helper(&self.config.perl.tidy_helpers)?),
            Tool::ShellLint => ToolCommand::new(Self::on_path(&self.config.shell.linter)?)
                .with_args(self.config.shell.linter_args.iter().cloned()),
            Tool::PythonFormat => ToolCommand::new(Self::on_path(&self.config.python.formatter)?)
                .with_args(self.config.python.formatter_args.iter().cloned()),
        };

        tracing::debug!("located {tool}: {command}");
        Some(command)
    }
}

/// Whether the carton flag is set, in the environment or the local file
fn carton_enabled(repo_root: &Path, config: &GateConfig) -> bool {
    let flag = &config.perl.carton_flag;
    if !SHELL_IDENTIFIER.is_match(flag) {
        tracing::warn!("Ignoring invalid carton flag name {flag:?}");
        return false;
    }

    if let Ok(value) = std::env::var(flag) {
        return is_truthy(&value);
    }

    let local_file = GateConfig::resolve_path(repo_root, &config.local_file);
    if !local_file.is_file() {
        return false;
    }

    source_flag(&local_file, flag)
        .map(|value| is_truthy(&value))
        .unwrap_or(false)
}

/// Source `file` in a throwaway shell and read back `flag`
fn source_flag(file: &Path, flag: &str) -> Option<String> {
    let script = format!(". \"$1\" >/dev/null 2>&1; printf '%s' \"${{{flag}:-}}\"");
    let output = Command::new("sh")
        .arg("-c")
        .arg(&script)
        .arg("sh")
        .arg(file)
        .output();

    match output {
        Ok(output) => Some(String::from_utf8_lossy(&output.stdout).trim().to_string()),
        Err(e) => {
            tracing::warn!("Failed to source {}: {e}", file.display());
            None
        }
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

fn is_executable(path: &Path) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}
