//! Content and name sniffing for staged files
//!
//! Scripts in this ecosystem often have no extension, so the first line is
//! inspected before falling back to the file name.

use super::{FileGroup, StagedFile};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Longest first line we bother reading for sniffing
const FIRST_LINE_LIMIT: u64 = 4096;

const PERL_EXTENSIONS: &[&str] = &["pl", "pm", "t", "sgi"];
const PYTHON_EXTENSIONS: &[&str] = &["py"];

lazy_static! {
    static ref PERL_SHEBANG: Regex = Regex::new(r"^\s*#!.*\bperl[0-9.]*(\s|$)").unwrap();
    static ref PYTHON_SHEBANG: Regex = Regex::new(r"^\s*#!.*\bpython[0-9.]*(\s|$)").unwrap();
    static ref SHELL_MODE: Regex = Regex::new(
        r"(?i)-\*-\s*(?:mode:\s*)?(?:sh|bash|shell-script)\s*(?:;[^*]*)?-\*-|\bvim?:.*\b(?:ft|filetype)=(?:sh|bash)\b"
    )
    .unwrap();
}

/// Build the staged-file view of `path`, sniffing its group when it is a regular file
pub fn classify(repo_root: &Path, path: &str) -> StagedFile {
    let full_path = repo_root.join(path);

    // symlink_metadata so a staged symlink is not followed
    let exists_on_disk = fs::symlink_metadata(&full_path)
        .map(|meta| meta.file_type().is_file())
        .unwrap_or(false);

    let group = if exists_on_disk {
        let first_line = read_first_line(&full_path).unwrap_or_default();
        group_for(path, &first_line)
    } else {
        tracing::debug!("{path} is not a regular file, not scanning it");
        FileGroup::Unclassified
    };

    tracing::trace!("classified {path} as {group}");

    StagedFile {
        path: path.to_string(),
        exists_on_disk,
        group,
    }
}

/// Decide the group from the file name and its first line; first match wins
pub fn group_for(path: &str, first_line: &str) -> FileGroup {
    if PERL_SHEBANG.is_match(first_line) || has_extension(path, PERL_EXTENSIONS) {
        FileGroup::Perl
    } else if SHELL_MODE.is_match(first_line) {
        FileGroup::Shell
    } else if PYTHON_SHEBANG.is_match(first_line) || has_extension(path, PYTHON_EXTENSIONS) {
        FileGroup::Python
    } else {
        FileGroup::Unclassified
    }
}

fn has_extension(path: &str, extensions: &[&str]) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

fn read_first_line(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file.take(FIRST_LINE_LIMIT));
    let mut bytes = Vec::new();
    reader.read_until(b'\n', &mut bytes).ok()?;
    Some(String::from_utf8_lossy(&bytes).trim_end().to_string())
}
