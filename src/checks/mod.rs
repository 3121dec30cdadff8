//! Check registry and orchestration
//!
//! Every check the gate can run is described once in [`registry::REGISTRY`];
//! the [`Orchestrator`] walks that list in order and produces exactly one
//! [`CheckResult`] per check it runs.

pub mod content;
pub mod orchestrator;
pub mod registry;
pub mod tools;

use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

pub use content::ContentRules;
pub use orchestrator::Orchestrator;
pub use registry::{CheckSpec, FailureSignal, Probe, REGISTRY};

/// Identifier of a check, as accepted by `--skip`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckId {
    /// Editor lock file next to a staged file
    UnsavedBuffers,
    /// Code parked "for later" or marked to be removed before commit
    DeadCode,
    /// Unresolved merge conflict markers
    ConflictMarkers,
    /// Explicit commit-stop marker left by an author
    StopMarker,
    /// Perl debugger breakpoints
    PerlDebugger,
    /// Use of the forbidden Perl test helper module
    PerlTestModule,
    /// Perl compile check helper
    PerlCompile,
    /// Perl tidy check helper
    PerlTidy,
    /// Shell linter
    Shellcheck,
    /// Python formatter in check mode
    PythonFormat,
}

impl CheckId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsavedBuffers => "unsaved-buffers",
            Self::DeadCode => "dead-code",
            Self::ConflictMarkers => "conflict-markers",
            Self::StopMarker => "stop-marker",
            Self::PerlDebugger => "perl-debugger",
            Self::PerlTestModule => "perl-test-module",
            Self::PerlCompile => "perl-compile",
            Self::PerlTidy => "perl-tidy",
            Self::Shellcheck => "shellcheck",
            Self::PythonFormat => "python-format",
        }
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks the operator asked not to run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipSet(BTreeSet<CheckId>);

impl SkipSet {
    pub fn contains(&self, id: CheckId) -> bool {
        self.0.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<CheckId> for SkipSet {
    fn from_iter<I: IntoIterator<Item = CheckId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Verdict of a single check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
    /// The check did not run; never counts as passed or failed
    Skipped { reason: String },
}

/// Reason recorded for checks named with `--skip`
pub const SKIPPED_BY_REQUEST: &str = "skipped by request";
/// Reason recorded when a check's external tool cannot be located
pub const TOOL_NOT_FOUND: &str = "tool not found";

/// Outcome of one check, with diagnostics attached verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub check: CheckId,
    pub label: &'static str,
    #[serde(flatten)]
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl CheckResult {
    pub fn pass(spec: &CheckSpec) -> Self {
        Self {
            check: spec.id,
            label: spec.label,
            status: CheckStatus::Pass,
            diagnostics: Vec::new(),
        }
    }

    pub fn fail(spec: &CheckSpec, diagnostics: Vec<String>) -> Self {
        Self {
            check: spec.id,
            label: spec.label,
            status: CheckStatus::Fail,
            diagnostics,
        }
    }

    pub fn skipped(spec: &CheckSpec, reason: impl Into<String>) -> Self {
        Self {
            check: spec.id,
            label: spec.label,
            status: CheckStatus::Skipped {
                reason: reason.into(),
            },
            diagnostics: Vec::new(),
        }
    }

    pub fn is_fail(&self) -> bool {
        self.status == CheckStatus::Fail
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, CheckStatus::Skipped { .. })
    }
}
