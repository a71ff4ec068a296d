//! Feature inventory sync
//!
//! The inventory is a human-authored YAML document declaring features,
//! their machine checks, and their checklist item texts. Syncing merges
//! the declaration into the record: new features appear as untested,
//! existing features keep their state and history, and features dropped
//! from the inventory are marked retired, never removed.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;

use crate::models::{ChecklistItem, Depth, Feature, MachineCheck};
use crate::state;
use crate::store::Record;

#[derive(Debug, Deserialize)]
pub struct Inventory {
    pub features: Vec<InventoryFeature>,
}

#[derive(Debug, Deserialize)]
pub struct InventoryFeature {
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub checks: Vec<InventoryCheck>,
    /// Item texts; ids are slugged from these.
    #[serde(default)]
    pub checklist: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct InventoryCheck {
    pub id: String,
    pub command: String,
    #[serde(default = "default_depth")]
    pub min_depth: Depth,
}

fn default_depth() -> Depth {
    Depth::Basic
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub added: usize,
    pub updated: usize,
    pub retired: usize,
}

pub fn load_inventory(path: &Path) -> Result<Inventory> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read inventory: {}", path.display()))?;
    let inventory: Inventory = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse inventory: {}", path.display()))?;
    Ok(inventory)
}

/// Merge the inventory into the record. The inventory is the source of
/// truth for what is declared; the record is the source of truth for
/// verification state.
pub fn sync(record: &mut Record, inventory: &Inventory, now: DateTime<Utc>) -> SyncSummary {
    let mut summary = SyncSummary::default();

    for declared in &inventory.features {
        match record.find_feature_mut(&declared.id) {
            None => {
                record.features.push(new_feature(declared, now));
                summary.added += 1;
            }
            Some(feature) => {
                merge_feature(feature, declared, now);
                summary.updated += 1;
            }
        }
    }

    for feature in &mut record.features {
        let declared = inventory.features.iter().any(|d| d.id == feature.id);
        if !declared && !feature.retired {
            feature.retired = true;
            feature.updated_at = now;
            summary.retired += 1;
        }
    }

    tracing::debug!(
        added = summary.added,
        updated = summary.updated,
        retired = summary.retired,
        "inventory synced"
    );
    summary
}

fn new_feature(declared: &InventoryFeature, now: DateTime<Utc>) -> Feature {
    let mut feature = Feature::new(&declared.id, &declared.category, &declared.description);
    feature.created_at = now;
    feature.updated_at = now;
    feature.checks = declared
        .checks
        .iter()
        .map(|c| MachineCheck::new(&c.id, &c.command, c.min_depth))
        .collect();
    feature.checklist = declared.checklist.iter().map(|t| ChecklistItem::new(t)).collect();
    feature
}

fn merge_feature(feature: &mut Feature, declared: &InventoryFeature, now: DateTime<Utc>) {
    feature.retired = false;
    feature.category = declared.category.clone();
    feature.description = declared.description.clone();

    // Checks: declaration wins for command and depth, recorded state is kept.
    for inv_check in &declared.checks {
        match feature.checks.iter_mut().find(|c| c.id == inv_check.id) {
            Some(check) => {
                check.command = inv_check.command.clone();
                check.min_depth = inv_check.min_depth;
            }
            None => feature.checks.push(MachineCheck::new(
                &inv_check.id,
                &inv_check.command,
                inv_check.min_depth,
            )),
        }
    }
    feature
        .checks
        .retain(|c| declared.checks.iter().any(|d| d.id == c.id));

    // Checklist: declared items are added, undeclared ones dropped,
    // completion state of surviving items preserved.
    let declared_items: Vec<ChecklistItem> =
        declared.checklist.iter().map(|t| ChecklistItem::new(t)).collect();
    let mut merged = Vec::with_capacity(declared_items.len());
    for mut item in declared_items {
        if let Some(existing) = feature.checklist.iter().find(|i| i.id == item.id) {
            item.completed = existing.completed;
            item.completed_by = existing.completed_by.clone();
            item.completed_at = existing.completed_at;
        }
        merged.push(item);
    }
    feature.checklist = merged;

    // A changed checklist can silently alter full-completion, so the
    // status must be re-derived through the state machine.
    state::resync(feature, now);
}
