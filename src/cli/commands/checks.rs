//! `commitgate checks`: list the registry in run order

use crate::checks::REGISTRY;
use crate::cli::{Format, Output};
use anyhow::Result;
use serde::Serialize;
use std::process::ExitCode;

#[derive(Serialize)]
struct CheckEntry {
    id: &'static str,
    label: &'static str,
    applies_to: String,
}

pub fn execute(format: Format, output: &Output) -> Result<ExitCode> {
    let entries: Vec<CheckEntry> = REGISTRY
        .iter()
        .map(|spec| CheckEntry {
            id: spec.id.as_str(),
            label: spec.label,
            applies_to: spec
                .group
                .map(|group| format!("{group} files"))
                .unwrap_or_else(|| "all files".to_string()),
        })
        .collect();

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        Format::Text => {
            output.header("Checks");
            for entry in &entries {
                output.table_row(entry.id, &format!("{} ({})", entry.label, entry.applies_to));
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
