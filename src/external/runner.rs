//! Subprocess invocation for external tools
//!
//! Tools run from the repository root with the file list appended to their
//! arguments. Output is captured in memory; a tool that outlives the timeout
//! is killed when its future is dropped.

use super::ToolCommand;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Captured result of one tool invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code; `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// stdout followed by stderr
    pub fn combined(&self) -> String {
        let mut combined = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !combined.is_empty() && !combined.ends_with('\n') {
                combined.push('\n');
            }
            combined.push_str(&self.stderr);
        }
        combined
    }

    /// Whether the tool printed anything at all, whitespace included
    pub fn has_output(&self) -> bool {
        !self.stdout.is_empty() || !self.stderr.is_empty()
    }
}

/// Run `command` against `files` from `cwd`, bounded by `timeout`
pub async fn run_tool(
    command: &ToolCommand,
    files: &[&str],
    cwd: &Path,
    timeout: Option<Duration>,
) -> Result<ToolOutput> {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .args(files)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .kill_on_drop(true);

    tracing::debug!("running {} with {} file(s)", command, files.len());

    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, cmd.output())
            .await
            .map_err(|_| anyhow::anyhow!("{} timed out after {}s", command, limit.as_secs()))?,
        None => cmd.output().await,
    }
    .with_context(|| format!("Failed to run {}", command))?;

    let result = ToolOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    tracing::trace!("{} exited with {:?}", command, result.code);

    Ok(result)
}
