//! The fixed, ordered list of checks

use super::CheckId;
use super::content::{self, ContentRules};
use crate::external::Tool;
use crate::files::{FileGroup, StagedFile};
use std::path::Path;

/// How an external tool reports a problem
///
/// Helpers and linters that print only on trouble are judged by output; the
/// Python formatter's check mode is judged by its exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureSignal {
    /// Any output on stdout or stderr, whitespace included
    AnyOutput,
    /// A non-zero exit status
    ExitStatus,
}

/// What a check inspects
#[derive(Clone, Copy)]
pub enum Probe {
    /// Looks at the working tree around each file; `Some` is a diagnostic
    Path(fn(&Path, &StagedFile) -> Option<String>),
    /// Scans each file's content line by line
    Content(fn(&ContentRules, &StagedFile, &str) -> Vec<String>),
    /// Runs an external tool once over all files of the check's group
    Tool {
        tool: Tool,
        signal: FailureSignal,
        /// Flag that makes the tool repair what it reported, for the hint
        fix_flag: Option<&'static str>,
    },
}

/// One registry entry
#[derive(Clone, Copy)]
pub struct CheckSpec {
    pub id: CheckId,
    pub label: &'static str,
    /// `None` for checks that apply to every staged file
    pub group: Option<FileGroup>,
    pub probe: Probe,
}

pub const REGISTRY: &[CheckSpec] = &[
    CheckSpec {
        id: CheckId::UnsavedBuffers,
        label: "Unsaved editor buffers",
        group: None,
        probe: Probe::Path(content::unsaved_buffer),
    },
    CheckSpec {
        id: CheckId::DeadCode,
        label: "Dead code markers",
        group: None,
        probe: Probe::Content(content::dead_code),
    },
    CheckSpec {
        id: CheckId::ConflictMarkers,
        label: "Merge conflict markers",
        group: None,
        probe: Probe::Content(content::conflict_markers),
    },
    CheckSpec {
        id: CheckId::StopMarker,
        label: "Commit stop markers",
        group: None,
        probe: Probe::Content(content::stop_marker),
    },
    CheckSpec {
        id: CheckId::PerlDebugger,
        label: "Perl debugger statements",
        group: Some(FileGroup::Perl),
        probe: Probe::Content(content::perl_debugger),
    },
    CheckSpec {
        id: CheckId::PerlTestModule,
        label: "Forbidden Perl test module",
        group: Some(FileGroup::Perl),
        probe: Probe::Content(content::perl_test_module),
    },
    CheckSpec {
        id: CheckId::PerlCompile,
        label: "Perl compile check",
        group: Some(FileGroup::Perl),
        probe: Probe::Tool {
            tool: Tool::PerlCompile,
            signal: FailureSignal::AnyOutput,
            fix_flag: None,
        },
    },
    CheckSpec {
        id: CheckId::PerlTidy,
        label: "Perl formatting",
        group: Some(FileGroup::Perl),
        probe: Probe::Tool {
            tool: Tool::PerlTidy,
            signal: FailureSignal::AnyOutput,
            fix_flag: Some("--fix"),
        },
    },
    CheckSpec {
        id: CheckId::Shellcheck,
        label: "Shell lint",
        group: Some(FileGroup::Shell),
        probe: Probe::Tool {
            tool: Tool::ShellLint,
            signal: FailureSignal::AnyOutput,
            fix_flag: None,
        },
    },
    CheckSpec {
        id: CheckId::PythonFormat,
        label: "Python formatting",
        group: Some(FileGroup::Python),
        probe: Probe::Tool {
            tool: Tool::PythonFormat,
            signal: FailureSignal::ExitStatus,
            fix_flag: None,
        },
    },
];

/// Look up the registry entry for `id`
pub fn spec(id: CheckId) -> &'static CheckSpec {
    REGISTRY
        .iter()
        .find(|spec| spec.id == id)
        .unwrap_or_else(|| unreachable!("{id} is missing from the registry"))
}
