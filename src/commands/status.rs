//! Status display command

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::models::Feature;

use super::common::{colored_status, load_record};

pub fn execute(dir: &Path, feature_filter: Option<&str>) -> Result<()> {
    let (_store, record) = load_record(dir)?;

    match feature_filter {
        Some(id) => {
            let feature = record
                .find_feature(id)
                .with_context(|| format!("Unknown feature '{id}'"))?;
            print_detail(feature);
        }
        None => {
            for feature in record.active_features() {
                let machine = if feature.machine_passing() {
                    "machine ✓".cyan()
                } else {
                    "machine −".dimmed()
                };
                println!(
                    "{:<28} {:<12} {} [{}]",
                    feature.id.bold(),
                    feature.category,
                    colored_status(&feature.status),
                    machine
                );
            }
        }
    }
    Ok(())
}

fn print_detail(feature: &Feature) {
    println!("{} ({})", feature.id.bold(), feature.category);
    if !feature.description.is_empty() {
        println!("  {}", feature.description);
    }
    if feature.retired {
        println!("  {}", "retired".red());
    }
    println!("  status: {}", colored_status(&feature.status));

    if !feature.checks.is_empty() {
        println!("\n  {}", "Machine checks:".bold());
        for check in &feature.checks {
            match check.latest_state() {
                Some(state) => println!(
                    "    {:<24} min {:<9} last {} at {}",
                    check.id,
                    check.min_depth.to_string(),
                    state.outcome,
                    state.at.format("%Y-%m-%d %H:%M")
                ),
                None => println!(
                    "    {:<24} min {:<9} {}",
                    check.id,
                    check.min_depth.to_string(),
                    "never run".dimmed()
                ),
            }
        }
    }

    if !feature.checklist.is_empty() {
        println!("\n  {}", "Checklist:".bold());
        for item in &feature.checklist {
            if item.completed {
                let by = item.completed_by.as_deref().unwrap_or("?");
                println!("    {} {} ({by})", "[x]".green(), item.text);
            } else {
                println!("    {} {} ({})", "[ ]".dimmed(), item.text, item.id.dimmed());
            }
        }
    }
}
