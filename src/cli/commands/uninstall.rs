use crate::cli::Output;
use crate::git::GitRepo;
use crate::hooks::PRE_COMMIT;
use anyhow::Result;
use std::process::ExitCode;

pub fn execute(output: &Output) -> Result<ExitCode> {
    let git = GitRepo::discover()?;

    if git.remove_hook(PRE_COMMIT)? {
        output.success(&format!("Removed {PRE_COMMIT} hook"));
    } else {
        output.info(&format!("No {PRE_COMMIT} hook installed by commitgate"));
    }

    Ok(ExitCode::SUCCESS)
}
