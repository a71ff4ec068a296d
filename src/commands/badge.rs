//! Badge emission command

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::badge::aggregate;

use super::common::load_record;

pub fn execute(dir: &Path, output: Option<&Path>) -> Result<()> {
    let (_store, record) = load_record(dir)?;
    let report = aggregate(&record);
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize badge report")?;

    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write badge report: {}", path.display()))?;
            println!(
                "{} Badge report written to {} ({:.0}% confirmed)",
                "✓".green().bold(),
                path.display(),
                report.overall.percent_confirmed
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}
