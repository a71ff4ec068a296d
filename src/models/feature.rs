//! Feature inventory model
//!
//! A feature is a named unit of functionality under verification. It owns
//! its machine checks, checklist items, derived status, and history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::depth::Depth;
use crate::models::history::HistoryEvent;
use crate::models::status::VerificationStatus;

/// Outcome of a single probe execution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckOutcome {
    Pass,
    Fail,
    Timeout,
}

impl std::fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckOutcome::Pass => write!(f, "pass"),
            CheckOutcome::Fail => write!(f, "fail"),
            CheckOutcome::Timeout => write!(f, "timeout"),
        }
    }
}

/// Last-known result of a check at one depth level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MachineState {
    pub outcome: CheckOutcome,
    pub at: DateTime<Utc>,
    /// Captured error or truncated stderr for failed/timed-out probes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// A declarative automated probe belonging to a feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MachineCheck {
    pub id: String,
    /// Shell command executed by the probe executor.
    pub command: String,
    /// Minimum depth at which this check participates in a run.
    pub min_depth: Depth,
    /// Last-known outcome per depth level. Only a run whose requested depth
    /// is >= `min_depth` may write here; lower-depth runs leave it untouched.
    #[serde(default)]
    pub state: BTreeMap<Depth, MachineState>,
}

impl MachineCheck {
    pub fn new(id: &str, command: &str, min_depth: Depth) -> Self {
        Self {
            id: id.to_string(),
            command: command.to_string(),
            min_depth,
            state: BTreeMap::new(),
        }
    }

    /// True if this check runs at the requested depth.
    pub fn is_due(&self, depth: Depth) -> bool {
        self.min_depth <= depth
    }

    /// Most recent recorded state across all depth levels.
    pub fn latest_state(&self) -> Option<&MachineState> {
        self.state.values().max_by_key(|s| s.at)
    }
}

/// A single human-attestable sub-requirement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl ChecklistItem {
    pub fn new(text: &str) -> Self {
        Self {
            id: slug_id(text),
            text: text.to_string(),
            completed: false,
            completed_by: None,
            completed_at: None,
        }
    }
}

/// Stable identifier derived from human-authored text.
pub fn slug_id(text: &str) -> String {
    let slug: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    let collapsed: Vec<&str> = slug.split('-').filter(|s| !s.is_empty()).collect();
    collapsed.join("-")
}

/// A named unit of functionality under verification.
///
/// Never physically deleted; features dropped from the inventory are marked
/// `retired` and excluded from runs and aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub checks: Vec<MachineCheck>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    pub status: VerificationStatus,
    #[serde(default)]
    pub retired: bool,
    #[serde(default)]
    pub history: Vec<HistoryEvent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Feature {
    pub fn new(id: &str, category: &str, description: &str) -> Self {
        let now = Utc::now();
        Self {
            id: id.to_string(),
            category: category.to_string(),
            description: description.to_string(),
            checks: Vec::new(),
            checklist: Vec::new(),
            status: VerificationStatus::Untested,
            retired: false,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks that participate in a run at the requested depth.
    pub fn due_checks(&self, depth: Depth) -> Vec<&MachineCheck> {
        self.checks.iter().filter(|c| c.is_due(depth)).collect()
    }

    /// The independent machine signal: every check that has ever run has a
    /// passing latest outcome, and at least one check has run. Queryable
    /// regardless of the overall status.
    pub fn machine_passing(&self) -> bool {
        let mut ran_any = false;
        for check in &self.checks {
            if let Some(state) = check.latest_state() {
                ran_any = true;
                if state.outcome != CheckOutcome::Pass {
                    return false;
                }
            }
        }
        ran_any
    }

    /// Number of completed checklist items.
    pub fn completed_items(&self) -> usize {
        self.checklist.iter().filter(|i| i.completed).count()
    }

    pub fn find_item_mut(&mut self, item_id: &str) -> Option<&mut ChecklistItem> {
        self.checklist.iter_mut().find(|i| i.id == item_id)
    }

    /// Append an audit event. History is append-only; nothing else touches it.
    pub fn record_event(&mut self, event: HistoryEvent) {
        self.updated_at = event.at;
        self.history.push(event);
    }
}
