//! Badge metric aggregation
//!
//! Read-only coverage statistics for external badge renderers. The output
//! schema is versioned independently of the record schema: badge consumers
//! update on a different cadence than the internal record format. Pure and
//! deterministic: identical record content yields identical output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::VerificationStatus;
use crate::store::Record;

/// Badge output schema version. v2 added per-category breakdowns.
pub const BADGE_SCHEMA_VERSION: u32 = 2;

/// Status bucket counts for one category (or overall).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryStats {
    pub total: usize,
    /// Human- or checklist-verified.
    pub confirmed: usize,
    /// Machine checks passing with no human confirmation.
    pub machine_only: usize,
    pub partially_checklisted: usize,
    pub untested: usize,
    pub invalidated: usize,
    /// Confirmed as a percentage of total; 0 for an empty bucket.
    pub percent_confirmed: f64,
}

impl CategoryStats {
    fn count(&mut self, status: &VerificationStatus) {
        self.total += 1;
        match status {
            VerificationStatus::ChecklistVerified { .. }
            | VerificationStatus::HumanVerified { .. } => self.confirmed += 1,
            VerificationStatus::MachineVerified { .. } => self.machine_only += 1,
            VerificationStatus::PartiallyChecklisted { .. } => self.partially_checklisted += 1,
            VerificationStatus::Untested => self.untested += 1,
            VerificationStatus::Invalidated { .. } => self.invalidated += 1,
        }
    }

    fn finalize(&mut self) {
        if self.total > 0 {
            self.percent_confirmed = self.confirmed as f64 * 100.0 / self.total as f64;
        }
    }
}

/// Versioned aggregate document for third-party consumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeReport {
    pub schema_version: u32,
    pub generated_at: DateTime<Utc>,
    pub overall: CategoryStats,
    pub categories: BTreeMap<String, CategoryStats>,
}

/// Compute per-category and overall coverage from the current record.
/// Retired features are excluded everywhere; the record is never mutated.
pub fn aggregate(record: &Record) -> BadgeReport {
    let mut overall = CategoryStats::default();
    let mut categories: BTreeMap<String, CategoryStats> = BTreeMap::new();

    for feature in record.active_features() {
        overall.count(&feature.status);
        categories
            .entry(feature.category.clone())
            .or_default()
            .count(&feature.status);
    }

    overall.finalize();
    for stats in categories.values_mut() {
        stats.finalize();
    }

    BadgeReport {
        schema_version: BADGE_SCHEMA_VERSION,
        generated_at: Utc::now(),
        overall,
        categories,
    }
}
