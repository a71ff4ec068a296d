//! Shared helpers for command implementations

use anyhow::{bail, Result};
use colored::{ColoredString, Colorize};
use std::path::Path;

use crate::models::VerificationStatus;
use crate::store::{Record, Store};

/// Open the store and load the record, with a friendly hint when no
/// record exists yet.
pub fn load_record(dir: &Path) -> Result<(Store, Record)> {
    let mut store = Store::new(dir);
    if !store.exists() {
        bail!(
            "No record found in {}. Run `attest sync <inventory>` first.",
            dir.display()
        );
    }
    let record = store.load()?;
    Ok((store, record))
}

/// Consistent status coloring across commands.
pub fn colored_status(status: &VerificationStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        VerificationStatus::Untested => text.dimmed(),
        VerificationStatus::MachineVerified { .. } => text.cyan(),
        VerificationStatus::PartiallyChecklisted { .. } => text.yellow(),
        VerificationStatus::ChecklistVerified { .. } => text.green(),
        VerificationStatus::HumanVerified { .. } => text.green().bold(),
        VerificationStatus::Invalidated { .. } => text.red(),
    }
}
