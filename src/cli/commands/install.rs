use crate::cli::Output;
use crate::git::GitRepo;
use crate::hooks::{PRE_COMMIT, hook_script};
use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Overwrite an existing pre-commit hook not written by commitgate
    #[arg(long)]
    pub force: bool,
}

pub fn execute(args: InstallArgs, output: &Output) -> Result<ExitCode> {
    let git = GitRepo::discover()?;

    if args.force && !git.hook_is_ours(PRE_COMMIT) {
        output.warning("Force mode enabled - an existing pre-commit hook will be overwritten");
    }

    git.install_hook(PRE_COMMIT, &hook_script(), args.force)?;
    output.success(&format!(
        "Installed {} hook in {}",
        PRE_COMMIT,
        git.git_dir().join("hooks").display()
    ));
    output.info("Pass options to hook runs through COMMITGATE_ARGS");

    Ok(ExitCode::SUCCESS)
}
