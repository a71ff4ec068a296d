//! Check run command

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::models::CheckOutcome;
use crate::runner::{run_checks, RunOptions, RunReport, Scope, ShellProbe};

use super::common::load_record;

/// Execute the run command. Returns true when every executed check
/// passed; the caller maps a dirty-but-complete run to its own exit code.
pub fn execute(
    dir: &Path,
    scope: &str,
    depth: Option<&str>,
    timeout_secs: Option<u64>,
    max_parallel: Option<usize>,
) -> Result<bool> {
    let config = Config::load(dir)?;
    let scope: Scope = scope.parse()?;
    let depth = match depth {
        Some(d) => d.parse()?,
        None => config.depth_or_default(),
    };

    let mut opts = RunOptions::new(scope.clone(), depth);
    opts.max_parallel = max_parallel.unwrap_or_else(|| config.max_parallel_or_default());
    opts.timeout = timeout_secs
        .or(config.timeout_secs)
        .map(Duration::from_secs);

    let (mut store, mut record) = load_record(dir)?;

    if let Scope::Feature(id) = &scope {
        let feature = record
            .find_feature(id)
            .with_context(|| format!("Unknown feature '{id}'"))?;
        if feature.retired {
            bail!("Feature '{id}' is retired");
        }
    }

    println!(
        "{} Running checks ({scope}, depth {depth})...\n",
        "→".cyan().bold()
    );

    let report = run_checks(&mut record, &opts, &ShellProbe::new());
    store.save(&mut record)?;

    print_report(&report);
    Ok(report.is_clean())
}

fn print_report(report: &RunReport) {
    for feature in &report.features {
        if feature.outcomes.is_empty() {
            continue;
        }
        println!("{}", feature.feature_id.bold());
        for outcome in &feature.outcomes {
            let mark = match outcome.outcome {
                CheckOutcome::Pass => "✓".green(),
                CheckOutcome::Fail => "✗".red(),
                CheckOutcome::Timeout => "⏱".yellow(),
            };
            let timing = format!("({}ms)", outcome.duration.as_millis()).dimmed();
            println!("  {mark} {} {timing}", outcome.check_id);
            if let Some(detail) = &outcome.detail {
                println!("      {}", detail.dimmed());
            }
        }
    }

    let total = report.total_checks();
    if total == 0 {
        println!("{} No checks due at this scope and depth", "−".dimmed());
        return;
    }

    println!();
    if report.is_clean() {
        println!("{} {total} checks passed", "✓".green().bold());
    } else {
        println!(
            "{} {} passed, {} failed, {} timed out",
            "Summary:".bold(),
            report.passed(),
            report.failed(),
            report.timed_out()
        );
    }
}
