//! Pre-commit hook implementation
//!
//! Reads the staged changes, builds the working set and runs every check
//! against it:
//! - editor lock files, dead code, conflict and stop markers on all files
//! - Perl debugger, test module, compile and tidy checks on Perl files
//! - shell lint on shell scripts
//! - formatter check on Python files

use super::HookContext;
use crate::checks::{ContentRules, Orchestrator};
use crate::cli::Output;
use crate::external::ToolLocator;
use crate::files::{IGNORE_FILE, IgnoreSet, WorkingSet};
use crate::git::GitRepo;
use crate::report::RunOutcome;
use anyhow::Result;

/// Execute the pre-commit checks and decide whether the commit may proceed
///
/// Only environment problems (no repository, no commit to compare against,
/// an unreadable ignore list or bad settings) are returned as errors; check
/// failures are part of the outcome.
pub async fn execute(
    git: &GitRepo,
    context: &HookContext,
    locator: &dyn ToolLocator,
    output: &Output,
) -> Result<RunOutcome> {
    let records = git.staged_changes()?;
    let ignore = IgnoreSet::load(&context.repo_root)?;
    let rules = ContentRules::from_config(&context.config)?;

    let working_set = WorkingSet::build(&context.repo_root, &records, &ignore);

    if working_set.is_empty() {
        output.info("No staged files to check");
    } else {
        output.step(&format!(
            "Checking {} staged file(s)",
            working_set.files().len()
        ));
    }
    if working_set.deleted > 0 {
        output.info(&format!(
            "{} deleted file(s) not checked",
            working_set.deleted
        ));
    }
    output.verbose_breakdown(&format!("ignored via {IGNORE_FILE}"), working_set.ignored);
    output.verbose_breakdown("not regular files", working_set.not_regular());

    let results = Orchestrator::new(
        &context.repo_root,
        &working_set,
        &context.skip,
        locator,
        &rules,
        output,
    )
    .with_timeout(context.config.tool_timeout())
    .run()
    .await;

    Ok(RunOutcome::decide(results, context.dry_run))
}
