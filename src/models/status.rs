//! Verification status of a feature
//!
//! The overall confirmation state derived by the state machine from machine
//! check outcomes, checklist completion, and explicit human actions.
//!
//! State machine transitions:
//! - `Untested` → `MachineVerified` (all due checks passed, no human signal)
//! - `Untested`/`PartiallyChecklisted` → `ChecklistVerified` (all items complete)
//! - `ChecklistVerified` → `PartiallyChecklisted` | `Untested` (item toggled off)
//! - any → `HumanVerified` (explicit verify action)
//! - any → `Invalidated` (explicit invalidate action with a reason)
//! - `Invalidated` → `HumanVerified` (explicit re-verification only)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Actor identity recorded when verification is derived from checklist
/// completion rather than an individual action.
pub const CHECKLIST_ACTOR: &str = "checklist";

/// Derived overall confirmation state of a feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum VerificationStatus {
    /// No signal of any kind yet.
    Untested,

    /// All due machine checks passed; no human confirmation.
    /// Reflects automation only and never substitutes for human signals.
    MachineVerified { at: DateTime<Utc> },

    /// Some but not all checklist items are complete.
    PartiallyChecklisted { complete: usize, total: usize },

    /// Every checklist item is complete. Recomputed, never set directly;
    /// `verified_by` is always the checklist pseudo-actor.
    ChecklistVerified {
        verified_by: String,
        at: DateTime<Utc>,
    },

    /// An identified human explicitly verified the feature. Not undone by
    /// subsequent checklist edits.
    HumanVerified {
        verified_by: String,
        at: DateTime<Utc>,
    },

    /// Explicitly revoked with a reason. Terminal until an explicit
    /// re-verification action.
    Invalidated {
        by: String,
        reason: String,
        at: DateTime<Utc>,
    },
}

impl VerificationStatus {
    /// Short machine-readable label, used in history events and output.
    pub fn label(&self) -> &'static str {
        match self {
            VerificationStatus::Untested => "untested",
            VerificationStatus::MachineVerified { .. } => "machine-verified",
            VerificationStatus::PartiallyChecklisted { .. } => "partially-checklisted",
            VerificationStatus::ChecklistVerified { .. } => "checklist-verified",
            VerificationStatus::HumanVerified { .. } => "human-verified",
            VerificationStatus::Invalidated { .. } => "invalidated",
        }
    }

    /// True for the fully-confirmed states (human or checklist).
    pub fn is_confirmed(&self) -> bool {
        matches!(
            self,
            VerificationStatus::ChecklistVerified { .. }
                | VerificationStatus::HumanVerified { .. }
        )
    }

    /// True for the sticky states that only explicit actions can leave.
    /// Recomputation from checklist/machine signals never moves these.
    pub fn is_sticky(&self) -> bool {
        matches!(
            self,
            VerificationStatus::HumanVerified { .. } | VerificationStatus::Invalidated { .. }
        )
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationStatus::PartiallyChecklisted { complete, total } => {
                write!(f, "partially-checklisted ({complete}/{total})")
            }
            VerificationStatus::ChecklistVerified { .. } => write!(f, "checklist-verified"),
            VerificationStatus::HumanVerified { verified_by, .. } => {
                write!(f, "human-verified (by {verified_by})")
            }
            VerificationStatus::Invalidated { reason, .. } => {
                write!(f, "invalidated ({reason})")
            }
            other => write!(f, "{}", other.label()),
        }
    }
}
