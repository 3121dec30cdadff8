//! Interpretation of external tool results

use super::registry::{CheckSpec, FailureSignal};
use super::CheckResult;
use crate::external::{ToolCommand, ToolOutput};

/// Turn a finished tool run into a verdict using the check's failure signal
pub fn interpret(
    spec: &CheckSpec,
    signal: FailureSignal,
    fix_flag: Option<&str>,
    command: &ToolCommand,
    files: &[&str],
    output: &ToolOutput,
) -> CheckResult {
    let failed = match signal {
        FailureSignal::AnyOutput => output.has_output(),
        FailureSignal::ExitStatus => !output.success(),
    };
    if !failed {
        return CheckResult::pass(spec);
    }

    let mut diagnostics: Vec<String> = output.combined().lines().map(str::to_string).collect();
    if diagnostics.is_empty() {
        let status = match output.code {
            Some(code) => format!("exited with status {code}"),
            None => "was terminated by a signal".to_string(),
        };
        diagnostics.push(format!("{} {}", command.program.display(), status));
    }
    if let Some(flag) = fix_flag {
        diagnostics.push(String::new());
        diagnostics.push(format!("To fix, run: {} {} {}", command, flag, files.join(" ")));
    }

    CheckResult::fail(spec, diagnostics)
}
