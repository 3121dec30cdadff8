//! Git hook entry points
//!
//! commitgate drives a single hook, `pre-commit`. The installed hook script
//! just execs the binary; options reach it through `COMMITGATE_ARGS`.

pub mod pre_commit;

use crate::checks::SkipSet;
use crate::config::GateConfig;
use crate::git::HOOK_MARKER;
use std::path::PathBuf;

/// Name of the hook file under `.git/hooks`
pub const PRE_COMMIT: &str = "pre-commit";

/// Everything a hook run needs besides the tools
pub struct HookContext {
    pub repo_root: PathBuf,
    pub config: GateConfig,
    pub skip: SkipSet,
    pub dry_run: bool,
}

/// Script written to `.git/hooks/pre-commit` by `commitgate install`
pub fn hook_script() -> String {
    format!("#!/bin/sh\n{HOOK_MARKER}\nexec commitgate \"$@\"\n")
}
