//! Command-line interface for commitgate
//!
//! Git runs the pre-commit hook without arguments, so options can also
//! arrive through `COMMITGATE_ARGS`. `COMMITGATE_SKIP` bypasses everything,
//! before any parsing happens.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

pub mod commands;
mod output;

pub use output::Output;

use crate::checks::CheckId;

/// Environment variable that skips the whole run when truthy
pub const SKIP_ENV: &str = "COMMITGATE_SKIP";
/// Environment variable carrying options for hook-triggered runs
pub const ARGS_ENV: &str = "COMMITGATE_ARGS";

/// commitgate - pre-commit validation gate
#[derive(Parser, Debug)]
#[command(name = "commitgate", author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
#[command(
    after_help = "When run from the pre-commit hook, options are read from COMMITGATE_ARGS.\n\
                  Set COMMITGATE_SKIP=1 to bypass all checks."
)]
pub struct Cli {
    /// Do not run the named check (repeatable)
    #[arg(short, long = "skip", value_name = "CHECK", value_enum)]
    pub skip: Vec<CheckId>,

    /// Skip every check and let the commit proceed
    #[arg(long)]
    pub skip_all: bool,

    /// Run all checks and report, but always abort the commit
    #[arg(long, visible_alias = "no-commit")]
    pub dry_run: bool,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress output; failures are still reported
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Use this configuration file instead of commitgate.toml/.yaml
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    pub format: Format,

    /// Run as if started in <DIR> instead of current working directory
    #[arg(short = 'C', long = "directory", value_name = "DIR", global = true)]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

/// Available commands; without one, the staged files are checked
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install the pre-commit hook into the current repository
    Install(commands::install::InstallArgs),
    /// Remove the pre-commit hook installed by commitgate
    Uninstall,
    /// List the available checks
    Checks,
}

impl Cli {
    /// Parse options from the command line, or from `COMMITGATE_ARGS` when
    /// the command line is empty (the hook case)
    pub fn from_invocation() -> Self {
        if std::env::args_os().len() > 1 {
            return Cli::parse();
        }

        match std::env::var(ARGS_ENV) {
            Ok(raw) if !raw.trim().is_empty() => {
                Cli::from_hook_args(&raw).unwrap_or_else(|e| exit_hook_error(e))
            }
            _ => Cli::parse(),
        }
    }

    /// Parse a whitespace-separated option string
    ///
    /// Help and version are only honored interactively; here `-h`/`--help`
    /// are dropped and every other help or version request is a usage error.
    pub fn from_hook_args(raw: &str) -> Result<Self, clap::Error> {
        let mut words = Vec::new();
        for word in raw.split_whitespace() {
            if word == "-h" || word == "--help" {
                Output::new(false, false)
                    .warning(&format!("Ignoring {word} from {ARGS_ENV}"));
                continue;
            }
            words.push(word);
        }

        let mut command = Cli::command()
            .disable_help_flag(true)
            .disable_version_flag(true);
        let subcommands: Vec<String> = command
            .get_subcommands()
            .map(|sub| sub.get_name().to_string())
            .collect();
        for name in subcommands {
            command = command.mut_subcommand(name, |sub| sub.disable_help_flag(true));
        }

        let matches =
            command.try_get_matches_from(std::iter::once("commitgate").chain(words))?;
        Cli::from_arg_matches(&matches)
    }

    /// Execute the CLI command
    pub async fn run(self) -> Result<ExitCode> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)
                .with_context(|| format!("Cannot change directory to {}", dir.display()))?;
        }

        setup_logging(self.verbose, self.quiet);

        let output = match self.format {
            Format::Json => Output::silent(),
            Format::Text => Output::new(self.verbose > 0, self.quiet),
        };

        match self.command {
            Some(Commands::Install(args)) => commands::install::execute(args, &output),
            Some(Commands::Uninstall) => commands::uninstall::execute(&output),
            Some(Commands::Checks) => commands::checks::execute(self.format, &output),
            None => {
                let args = commands::run::RunArgs {
                    skip: self.skip,
                    skip_all: self.skip_all,
                    dry_run: self.dry_run,
                    config: self.config,
                    format: self.format,
                };
                commands::run::execute(args, &output).await
            }
        }
    }
}

/// Report a hook-path parse error and exit; never with status 0
fn exit_hook_error(err: clap::Error) -> ! {
    let code = match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 2,
        _ => err.exit_code().max(1),
    };
    let _ = err.print();
    std::process::exit(code)
}

/// Whether `COMMITGATE_SKIP` asks to bypass the run
pub fn skip_requested() -> bool {
    std::env::var(SKIP_ENV)
        .map(|value| {
            !matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "" | "0" | "false" | "no"
            )
        })
        .unwrap_or(false)
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_args_are_split() {
        let cli = Cli::from_hook_args("--skip perl-tidy -s shellcheck --dry-run -q").unwrap();
        assert_eq!(cli.skip, vec![CheckId::PerlTidy, CheckId::Shellcheck]);
        assert!(cli.dry_run);
        assert!(cli.quiet);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_hook_args_drop_help() {
        let cli = Cli::from_hook_args("--help --no-commit").unwrap();
        assert!(cli.dry_run);
    }

    #[test]
    fn test_hook_args_cannot_request_help_or_version() {
        for raw in ["help", "-qh", "-V", "--version", "install -qh", "help install"] {
            let err = Cli::from_hook_args(raw).unwrap_err();
            assert!(
                !matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion),
                "{raw} must be a usage error, got {:?}",
                err.kind()
            );
        }
    }

    #[test]
    fn test_interactive_help_still_works() {
        let err = Cli::try_parse_from(["commitgate", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(Cli::try_parse_from(["commitgate", "help"]).is_err());
    }

    #[test]
    fn test_unknown_check_is_rejected() {
        let err = Cli::from_hook_args("--skip no-such-check").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let err = Cli::from_hook_args("--frobnicate").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["commitgate", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
