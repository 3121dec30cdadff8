//! Command implementations for commitgate
//!
//! Checking the staged files is the default; the other commands manage the
//! hook and describe what would run.

pub mod checks;
pub mod install;
pub mod run;
pub mod uninstall;
