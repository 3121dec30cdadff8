//! External tool integration
//!
//! Everything that touches the environment to find or run a linter lives
//! here. Checks ask a [`ToolLocator`] for a command and hand it to
//! [`runner::run_tool`]; they never probe paths themselves.

pub mod locator;
pub mod runner;

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

pub use locator::{SystemLocator, ToolLocator};
pub use runner::{ToolOutput, run_tool};

/// External validators the gate knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    PerlCompile,
    PerlTidy,
    ShellLint,
    PythonFormat,
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PerlCompile => "perl compile-check helper",
            Self::PerlTidy => "perl tidy-check helper",
            Self::ShellLint => "shell linter",
            Self::PythonFormat => "python formatter",
        };
        f.write_str(name)
    }
}

/// A located, ready-to-run tool: program plus leading arguments
///
/// File paths are appended after `args` at invocation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
