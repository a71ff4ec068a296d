//! Versioned record schemas
//!
//! The persisted record declares its schema version explicitly so the
//! store can select the correct migration chain. Older shapes are kept
//! here as raw deserialization targets for the migrations module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Depth, Feature};

/// Current record schema version.
pub const SCHEMA_VERSION: u32 = 3;

/// Current in-memory record (schema v3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub schema_version: u32,
    /// Monotonic write counter used for stale-write detection.
    pub revision: u64,
    pub updated_at: DateTime<Utc>,
    pub features: Vec<Feature>,
}

impl Record {
    pub fn new() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            revision: 0,
            updated_at: Utc::now(),
            features: Vec::new(),
        }
    }

    pub fn find_feature(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn find_feature_mut(&mut self, id: &str) -> Option<&mut Feature> {
        self.features.iter_mut().find(|f| f.id == id)
    }

    /// Features still in the inventory (not retired).
    pub fn active_features(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter().filter(|f| !f.retired)
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Schema v1: checklist items were plain strings; no machine state, no
// history, no human verification metadata beyond a single who/when pair.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordV1 {
    pub schema_version: u32,
    pub features: Vec<FeatureV1>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeatureV1 {
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub checks: Vec<CheckV1>,
    /// Plain item texts; structured into objects by the v1→v2 migration.
    #[serde(default)]
    pub checklist: Vec<String>,
    #[serde(default)]
    pub verified_by: Option<String>,
    #[serde(default)]
    pub verified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckV1 {
    pub id: String,
    pub command: String,
    #[serde(default = "default_min_depth")]
    pub min_depth: Depth,
}

fn default_min_depth() -> Depth {
    Depth::Basic
}

// ---------------------------------------------------------------------------
// Schema v2: structured checklist items; still no per-depth machine state,
// retired flag, or history.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordV2 {
    pub schema_version: u32,
    pub features: Vec<FeatureV2>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeatureV2 {
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub checks: Vec<CheckV1>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItemV2>,
    #[serde(default)]
    pub verified_by: Option<String>,
    #[serde(default)]
    pub verified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChecklistItemV2 {
    /// Some v2 records predate stable item ids; the v2→v3 migration slugs
    /// the text when missing.
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_by: Option<String>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}
