//! Checklist toggle command

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use std::path::Path;

use crate::checklist;
use crate::config::Config;

use super::common::{colored_status, load_record};

pub fn execute(dir: &Path, feature_id: &str, item_id: &str, actor: Option<&str>) -> Result<()> {
    let config = Config::load(dir)?;
    let actor = config.resolve_actor(actor);

    let (mut store, mut record) = load_record(dir)?;
    let feature = record
        .find_feature_mut(feature_id)
        .with_context(|| format!("Unknown feature '{feature_id}'"))?;

    let status = checklist::toggle(feature, item_id, &actor, Utc::now())?;
    let completed = feature
        .checklist
        .iter()
        .find(|i| i.id == item_id)
        .map(|i| i.completed)
        .unwrap_or(false);
    store.save(&mut record)?;

    let mark = if completed { "[x]".green() } else { "[ ]".dimmed() };
    println!(
        "{} {mark} {item_id} on {feature_id} → {}",
        "✓".green().bold(),
        colored_status(&status)
    );
    Ok(())
}
