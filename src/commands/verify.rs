//! Explicit human verification command

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use std::path::Path;

use crate::config::Config;
use crate::state;

use super::common::load_record;

pub fn execute(dir: &Path, feature_id: &str, actor: Option<&str>) -> Result<()> {
    let config = Config::load(dir)?;
    let actor = config.resolve_actor(actor);

    let (mut store, mut record) = load_record(dir)?;
    let feature = record
        .find_feature_mut(feature_id)
        .with_context(|| format!("Unknown feature '{feature_id}'"))?;

    state::human_verify(feature, &actor, Utc::now())?;
    store.save(&mut record)?;

    println!(
        "{} {feature_id} human-verified by {}",
        "✓".green().bold(),
        actor.bold()
    );
    Ok(())
}
