//! # commitgate
//!
//! A pre-commit validation gate. It reads the staged changes of a Git
//! repository, classifies the files, and runs a fixed, ordered set of
//! checks over them: editor lock files, dead code, conflict and stop
//! markers, Perl debugger and test-module usage, and the configured Perl,
//! shell and Python tools. Any failing check aborts the commit.
//!
//! ## Quick Start
//!
//! ```bash
//! # Install the hook in the current repository
//! commitgate install
//!
//! # Check what is staged right now, without committing
//! commitgate --dry-run
//!
//! # Options for hook-triggered runs
//! COMMITGATE_ARGS="--skip perl-tidy" git commit
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod external;
pub mod files;
pub mod git;
pub mod hooks;
pub mod report;

pub use cli::{Cli, Output};
pub use config::GateConfig;

/// Result type alias for commitgate operations
pub type Result<T> = anyhow::Result<T>;
