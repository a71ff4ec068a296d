//! Audit history display command

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::models::EventKind;

use super::common::load_record;

pub fn execute(dir: &Path, feature_id: &str) -> Result<()> {
    let (_store, record) = load_record(dir)?;
    let feature = record
        .find_feature(feature_id)
        .with_context(|| format!("Unknown feature '{feature_id}'"))?;

    if feature.history.is_empty() {
        println!("{} No history for {feature_id}", "−".dimmed());
        return Ok(());
    }

    for event in &feature.history {
        let when = event.at.format("%Y-%m-%d %H:%M:%S");
        let kind = event.kind.label().bold();
        let transition = if event.from == event.to {
            event.to.clone().normal()
        } else {
            format!("{} → {}", event.from, event.to).yellow()
        };
        println!("{} {kind:<18} {:<12} {transition}", when, event.actor);
        match &event.kind {
            EventKind::ChecklistToggle { item, completed } => {
                let mark = if *completed { "[x]" } else { "[ ]" };
                println!("    {mark} {item}");
            }
            EventKind::CheckRun {
                depth,
                passed,
                failed,
                timed_out,
            } => {
                println!("    depth {depth}: {passed} passed, {failed} failed, {timed_out} timed out");
            }
            EventKind::Invalidate { reason } => println!("    reason: {reason}"),
            EventKind::NoteAdded { note } => println!("    {note}"),
            EventKind::HumanVerify => {}
        }
    }
    Ok(())
}
