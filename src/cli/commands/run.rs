//! Default command: validate the staged changes

use crate::checks::{CheckId, SkipSet};
use crate::cli::{Format, Output};
use crate::config::GateConfig;
use crate::external::SystemLocator;
use crate::git::GitRepo;
use crate::hooks::{HookContext, pre_commit};
use crate::report::RunOutcome;
use anyhow::Result;
use std::path::PathBuf;
use std::process::ExitCode;

pub struct RunArgs {
    pub skip: Vec<CheckId>,
    pub skip_all: bool,
    pub dry_run: bool,
    pub config: Option<PathBuf>,
    pub format: Format,
}

pub async fn execute(args: RunArgs, output: &Output) -> Result<ExitCode> {
    if args.skip_all {
        output.warning("All checks skipped by request");
        let outcome = RunOutcome::skipped_all();
        if args.format == Format::Json {
            println!("{}", outcome.to_json()?);
        }
        return Ok(outcome.exit_code());
    }

    let git = GitRepo::discover()?;
    let repo_root = git.workdir()?.to_path_buf();
    let config = GateConfig::load(&repo_root, args.config.as_deref())?;

    let locator = SystemLocator::new(&repo_root, &config);
    let context = HookContext {
        repo_root,
        config,
        skip: args.skip.into_iter().collect::<SkipSet>(),
        dry_run: args.dry_run,
    };

    let outcome = pre_commit::execute(&git, &context, &locator, output).await?;

    match args.format {
        Format::Json => println!("{}", outcome.to_json()?),
        Format::Text => outcome.render(output),
    }

    Ok(outcome.exit_code())
}
