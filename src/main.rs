use anyhow::Result;
use commitgate::cli::{self, Cli};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    if cli::skip_requested() {
        return Ok(ExitCode::SUCCESS);
    }

    let cli = Cli::from_invocation();
    cli.run().await
}
