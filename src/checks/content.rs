//! Built-in content checks
//!
//! Each scanner reports one diagnostic per offending line, formatted as
//! `path:line: text` with the line reproduced unmodified.

use crate::config::GateConfig;
use crate::files::StagedFile;
use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

/// Escape literal that lets a line mention the stop marker
pub const STOP_MARKER_ESCAPE: &str = "<GCSLITERAL>";

const CONFLICT_START: &str = "<<<<<<<";
const CONFLICT_END: &str = ">>>>>>>";

lazy_static! {
    static ref DEAD_CODE: Regex = Regex::new(
        r"(?i)=for\s+(?:later|comparison|review)\b|\b(?:restore|remove)\s+before\s+commit\b"
    )
    .unwrap();
    static ref STOP_MARKER: Regex = Regex::new(r"(?i)<(?:gitcommitstop|gcs)>").unwrap();
    static ref PERL_DEBUGGER: Regex = Regex::new(r"\$DB::single\s*=").unwrap();
}

/// Settings-dependent patterns, compiled once per run
#[derive(Debug, Clone)]
pub struct ContentRules {
    forbidden_module: Regex,
    /// `Test/Focus.pm` for `Test::Focus`
    forbidden_module_file: String,
}

impl ContentRules {
    pub fn from_config(config: &GateConfig) -> Result<Self> {
        let module = config.perl.forbidden_module.trim();
        let forbidden_module = Regex::new(&format!(r"\b{}\b", regex::escape(module)))
            .with_context(|| format!("Invalid forbidden module name: {module}"))?;

        Ok(Self {
            forbidden_module,
            forbidden_module_file: format!("{}.pm", module.replace("::", "/")),
        })
    }

    fn is_forbidden_module_definition(&self, path: &str) -> bool {
        path == self.forbidden_module_file
            || path.ends_with(&format!("/{}", self.forbidden_module_file))
    }
}

/// An editor lock symlink (`.#name`) next to the file means unsaved changes
pub fn unsaved_buffer(repo_root: &Path, file: &StagedFile) -> Option<String> {
    let path = Path::new(&file.path);
    let name = path.file_name()?.to_string_lossy();
    let lock_name = format!(".#{name}");
    let lock_path = match path.parent() {
        Some(parent) => repo_root.join(parent).join(&lock_name),
        None => repo_root.join(&lock_name),
    };

    let is_lock = std::fs::symlink_metadata(&lock_path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);

    is_lock.then(|| {
        format!(
            "{}: an editor has unsaved changes ({} exists)",
            file.path, lock_name
        )
    })
}

pub fn dead_code(_rules: &ContentRules, file: &StagedFile, content: &str) -> Vec<String> {
    matching_lines(file, content, |line| DEAD_CODE.is_match(line))
}

pub fn conflict_markers(_rules: &ContentRules, file: &StagedFile, content: &str) -> Vec<String> {
    matching_lines(file, content, |line| {
        line.starts_with(CONFLICT_START) || line.ends_with(CONFLICT_END)
    })
}

/// The escape literal only excuses the line it appears on
pub fn stop_marker(_rules: &ContentRules, file: &StagedFile, content: &str) -> Vec<String> {
    matching_lines(file, content, |line| {
        STOP_MARKER.is_match(line) && !line.contains(STOP_MARKER_ESCAPE)
    })
}

pub fn perl_debugger(_rules: &ContentRules, file: &StagedFile, content: &str) -> Vec<String> {
    matching_lines(file, content, |line| PERL_DEBUGGER.is_match(line))
}

pub fn perl_test_module(rules: &ContentRules, file: &StagedFile, content: &str) -> Vec<String> {
    if rules.is_forbidden_module_definition(&file.path) {
        return Vec::new();
    }
    matching_lines(file, content, |line| rules.forbidden_module.is_match(line))
}

fn matching_lines(file: &StagedFile, content: &str, is_match: impl Fn(&str) -> bool) -> Vec<String> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| is_match(line))
        .map(|(index, line)| format!("{}:{}: {}", file.path, index + 1, line))
        .collect()
}
