//! Inventory sync command

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use std::path::Path;

use crate::inventory::{load_inventory, sync};
use crate::store::Store;

pub fn execute(dir: &Path, inventory_path: &Path) -> Result<()> {
    let inventory = load_inventory(inventory_path)?;

    let mut store = Store::new(dir);
    let mut record = store.load_or_init()?;
    let summary = sync(&mut record, &inventory, Utc::now());
    store.save(&mut record)?;

    println!(
        "{} Inventory synced: {} added, {} updated, {} retired ({} features tracked)",
        "✓".green().bold(),
        summary.added,
        summary.updated,
        summary.retired,
        record.active_features().count()
    );
    Ok(())
}
