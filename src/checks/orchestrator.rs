//! Sequential check runner
//!
//! Checks run strictly in registry order, one at a time. Nothing a check
//! does can abort the run: unreadable files and tools that fail to start
//! become failures of that check, and the next check still runs.

use super::registry::{CheckSpec, FailureSignal, Probe, REGISTRY};
use super::{CheckResult, CheckStatus, ContentRules, SKIPPED_BY_REQUEST, SkipSet, TOOL_NOT_FOUND};
use super::tools;
use crate::cli::Output;
use crate::external::{Tool, ToolLocator, run_tool};
use crate::files::{StagedFile, WorkingSet};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Runs the registry against one working set
pub struct Orchestrator<'a> {
    repo_root: &'a Path,
    files: &'a WorkingSet,
    skip: &'a SkipSet,
    locator: &'a dyn ToolLocator,
    rules: &'a ContentRules,
    output: &'a Output,
    timeout: Option<Duration>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        repo_root: &'a Path,
        files: &'a WorkingSet,
        skip: &'a SkipSet,
        locator: &'a dyn ToolLocator,
        rules: &'a ContentRules,
        output: &'a Output,
    ) -> Self {
        Self {
            repo_root,
            files,
            skip,
            locator,
            rules,
            output,
            timeout: None,
        }
    }

    /// Bound every external tool invocation
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run every applicable check and return the result log in registry order
    pub async fn run(&self) -> Vec<CheckResult> {
        let contents = self.load_contents();
        let mut results = Vec::new();

        for spec in REGISTRY {
            if let Some(result) = self.run_check(spec, &contents).await {
                self.report(&result);
                results.push(result);
            }
        }

        results
    }

    /// `None` when the check has nothing to look at and is not run at all
    async fn run_check(
        &self,
        spec: &CheckSpec,
        contents: &HashMap<&str, Result<String, String>>,
    ) -> Option<CheckResult> {
        let files: Vec<&StagedFile> = match spec.group {
            Some(group) => self.files.group(group),
            None => self.files.regular_files().collect(),
        };

        if spec.group.is_some() && files.is_empty() {
            tracing::trace!("{}: no files in its group, not running", spec.id);
            return None;
        }
        if self.skip.contains(spec.id) {
            return Some(CheckResult::skipped(spec, SKIPPED_BY_REQUEST));
        }

        self.output
            .verbose(&format!("{} on {} file(s)", spec.label, files.len()));

        let result = match spec.probe {
            Probe::Path(inspect) => {
                let diagnostics = files
                    .iter()
                    .filter_map(|file| inspect(self.repo_root, file))
                    .collect();
                verdict(spec, diagnostics)
            }
            Probe::Content(scan) => {
                let mut diagnostics = Vec::new();
                for file in &files {
                    match contents.get(file.path.as_str()) {
                        Some(Ok(text)) => diagnostics.extend(scan(self.rules, file, text)),
                        Some(Err(e)) => {
                            diagnostics.push(format!("{}: could not be read: {}", file.path, e))
                        }
                        None => {}
                    }
                }
                verdict(spec, diagnostics)
            }
            Probe::Tool {
                tool,
                signal,
                fix_flag,
            } => self.run_tool_check(spec, tool, signal, fix_flag, &files).await,
        };

        Some(result)
    }

    async fn run_tool_check(
        &self,
        spec: &CheckSpec,
        tool: Tool,
        signal: FailureSignal,
        fix_flag: Option<&str>,
        files: &[&StagedFile],
    ) -> CheckResult {
        let Some(command) = self.locator.locate(tool) else {
            tracing::debug!("{}: no {} available", spec.id, tool);
            return CheckResult::skipped(spec, TOOL_NOT_FOUND);
        };

        let paths: Vec<&str> = files.iter().map(|file| file.path.as_str()).collect();
        match run_tool(&command, &paths, self.repo_root, self.timeout).await {
            Ok(output) => tools::interpret(spec, signal, fix_flag, &command, &paths, &output),
            Err(e) => CheckResult::fail(spec, vec![format!("{e:#}")]),
        }
    }

    /// Content of every regular file, read once and shared by all content checks
    fn load_contents(&self) -> HashMap<&'a str, Result<String, String>> {
        self.files
            .regular_files()
            .map(|file| {
                let content = std::fs::read(self.repo_root.join(&file.path))
                    .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                    .map_err(|e| e.to_string());
                (file.path.as_str(), content)
            })
            .collect()
    }

    fn report(&self, result: &CheckResult) {
        match &result.status {
            CheckStatus::Pass => self.output.success(result.label),
            CheckStatus::Fail => {
                self.output.error(result.label);
                for line in &result.diagnostics {
                    self.output.diagnostic(line);
                }
            }
            CheckStatus::Skipped { reason } => {
                self.output
                    .warning(&format!("{} skipped ({})", result.label, reason));
            }
        }
    }
}

fn verdict(spec: &CheckSpec, diagnostics: Vec<String>) -> CheckResult {
    if diagnostics.is_empty() {
        CheckResult::pass(spec)
    } else {
        CheckResult::fail(spec, diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::CheckId;
    use crate::config::GateConfig;
    use crate::external::ToolCommand;
    use crate::files::IgnoreSet;
    use crate::git::{ChangeKind, ChangeRecord};
    use tempfile::TempDir;

    #[derive(Default)]
    struct StubLocator {
        tools: HashMap<Tool, ToolCommand>,
    }

    impl StubLocator {
        fn with(mut self, tool: Tool, script: &str) -> Self {
            self.tools.insert(
                tool,
                ToolCommand::new("sh").with_args(["-c", script, "sh"]),
            );
            self
        }
    }

    impl ToolLocator for StubLocator {
        fn locate(&self, tool: Tool) -> Option<ToolCommand> {
            self.tools.get(&tool).cloned()
        }
    }

    fn working_set(root: &Path, files: &[(&str, &str)]) -> WorkingSet {
        let mut records = Vec::new();
        for (path, content) in files {
            let full = root.join(path);
            std::fs::create_dir_all(full.parent().unwrap()).unwrap();
            std::fs::write(full, content).unwrap();
            records.push(ChangeRecord {
                path: path.to_string(),
                kind: ChangeKind::Added,
            });
        }
        WorkingSet::build(root, &records, &IgnoreSet::default())
    }

    async fn run(root: &Path, files: &WorkingSet, skip: &SkipSet, locator: &StubLocator) -> Vec<CheckResult> {
        let rules = ContentRules::from_config(&GateConfig::default()).unwrap();
        let output = Output::silent();
        Orchestrator::new(root, files, skip, locator, &rules, &output)
            .run()
            .await
    }

    fn ids(results: &[CheckResult]) -> Vec<CheckId> {
        results.iter().map(|r| r.check).collect()
    }

    #[tokio::test]
    async fn test_unclassified_files_only_run_global_checks() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let files = working_set(root, &[("README.txt", "<<<<<<< HEAD\n")]);

        let results = run(root, &files, &SkipSet::default(), &StubLocator::default()).await;

        assert_eq!(
            ids(&results),
            vec![
                CheckId::UnsavedBuffers,
                CheckId::DeadCode,
                CheckId::ConflictMarkers,
                CheckId::StopMarker
            ]
        );
        let failed: Vec<_> = results.iter().filter(|r| r.is_fail()).map(|r| r.check).collect();
        assert_eq!(failed, vec![CheckId::ConflictMarkers]);
    }

    #[tokio::test]
    async fn test_skip_set_marks_checks_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let files = working_set(root, &[("a.txt", "<<<<<<< HEAD\n")]);
        let skip: SkipSet = [CheckId::ConflictMarkers].into_iter().collect();

        let results = run(root, &files, &skip, &StubLocator::default()).await;

        let conflict = results
            .iter()
            .find(|r| r.check == CheckId::ConflictMarkers)
            .unwrap();
        assert_eq!(
            conflict.status,
            CheckStatus::Skipped {
                reason: SKIPPED_BY_REQUEST.to_string()
            }
        );
        assert!(results.iter().all(|r| !r.is_fail()));
    }

    #[tokio::test]
    async fn test_perl_group_runs_tools_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let files = working_set(
            root,
            &[
                ("lib/A.pm", "package A;\n$DB::single = 1;\n1;\n"),
                ("notes.txt", "plain\n"),
            ],
        );
        let locator = StubLocator::default()
            .with(Tool::PerlCompile, "exit 0")
            .with(Tool::PerlTidy, "echo \"$1 is untidy\"");

        let results = run(root, &files, &SkipSet::default(), &locator).await;

        assert_eq!(results.len(), 8);
        let by_id: HashMap<_, _> = results.iter().map(|r| (r.check, r)).collect();
        assert!(by_id[&CheckId::PerlDebugger].is_fail());
        assert_eq!(by_id[&CheckId::PerlTestModule].status, CheckStatus::Pass);
        assert_eq!(by_id[&CheckId::PerlCompile].status, CheckStatus::Pass);

        let tidy = by_id[&CheckId::PerlTidy];
        assert!(tidy.is_fail());
        assert_eq!(tidy.diagnostics[0], "lib/A.pm is untidy");
        assert!(tidy.diagnostics.last().unwrap().contains("--fix lib/A.pm"));
    }

    #[tokio::test]
    async fn test_missing_tool_is_skipped_not_failed() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let files = working_set(root, &[("run", "# -*- sh -*-\necho hi\n")]);

        let results = run(root, &files, &SkipSet::default(), &StubLocator::default()).await;

        let lint = results.last().unwrap();
        assert_eq!(lint.check, CheckId::Shellcheck);
        assert_eq!(
            lint.status,
            CheckStatus::Skipped {
                reason: TOOL_NOT_FOUND.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_tool_that_cannot_start_fails_its_check() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let files = working_set(root, &[("tool.py", "print(1)\n")]);
        let mut locator = StubLocator::default();
        locator.tools.insert(
            Tool::PythonFormat,
            ToolCommand::new("/nonexistent/commitgate-black"),
        );

        let results = run(root, &files, &SkipSet::default(), &locator).await;

        let format = results.last().unwrap();
        assert_eq!(format.check, CheckId::PythonFormat);
        assert!(format.is_fail());
        assert!(format.diagnostics[0].contains("Failed to run"));
    }

    #[tokio::test]
    async fn test_timeout_fails_the_check() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let files = working_set(root, &[("run", "# -*- bash -*-\n")]);
        let locator = StubLocator::default().with(Tool::ShellLint, "sleep 5");
        let rules = ContentRules::from_config(&GateConfig::default()).unwrap();
        let output = Output::silent();
        let skip = SkipSet::default();

        let results = Orchestrator::new(root, &files, &skip, &locator, &rules, &output)
            .with_timeout(Some(Duration::from_millis(100)))
            .run()
            .await;

        let lint = results.last().unwrap();
        assert!(lint.is_fail());
        assert!(lint.diagnostics[0].contains("timed out"));
    }
}
