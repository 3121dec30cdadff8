//! Result aggregation
//!
//! Folds the result log into the single proceed/abort decision and renders
//! it for the operator.

use crate::checks::CheckResult;
use crate::cli::Output;
use serde::Serialize;
use std::process::ExitCode;

/// Whether the commit may go ahead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Proceed,
    Abort,
}

/// Terminal artifact of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub overall: Decision,
    /// Set when the abort was forced by `--dry-run`
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
    pub results: Vec<CheckResult>,
}

impl RunOutcome {
    /// Decide from the result log; a dry run always aborts
    pub fn decide(results: Vec<CheckResult>, dry_run: bool) -> Self {
        let overall = if dry_run || results.iter().any(CheckResult::is_fail) {
            Decision::Abort
        } else {
            Decision::Proceed
        };
        Self {
            overall,
            dry_run,
            results,
        }
    }

    /// Outcome of a run short-circuited by a skip-all request
    pub fn skipped_all() -> Self {
        Self {
            overall: Decision::Proceed,
            dry_run: false,
            results: Vec::new(),
        }
    }

    pub fn failures(&self) -> usize {
        self.results.iter().filter(|r| r.is_fail()).count()
    }

    pub fn skipped(&self) -> usize {
        self.results.iter().filter(|r| r.is_skipped()).count()
    }

    pub fn passed(&self) -> usize {
        self.results.len() - self.failures() - self.skipped()
    }

    pub fn exit_code(&self) -> ExitCode {
        match self.overall {
            Decision::Proceed => ExitCode::SUCCESS,
            Decision::Abort => ExitCode::FAILURE,
        }
    }

    /// The final line shown to the operator
    pub fn summary_line(&self) -> String {
        let failures = self.failures();
        match (self.overall, failures) {
            (Decision::Proceed, _) => "All checks passed, commit may proceed".to_string(),
            (Decision::Abort, 0) => "Dry run: commit aborted (no checks failed)".to_string(),
            (Decision::Abort, n) if self.dry_run => {
                format!("Dry run: commit aborted ({n} check(s) failed)")
            }
            (Decision::Abort, n) => format!("{n} check(s) failed, commit aborted"),
        }
    }

    /// Render the closing summary
    pub fn render(&self, output: &Output) {
        output.header("Summary");
        output.summary_stats("passed", self.passed());
        output.summary_stats("failed", self.failures());
        output.summary_stats("skipped", self.skipped());

        match self.overall {
            Decision::Proceed => output.success(&self.summary_line()),
            Decision::Abort => output.error(&self.summary_line()),
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
