//! Append-only feature history
//!
//! Every status-affecting action appends exactly one event. The history is
//! never edited or reordered; it is the audit trail of how a feature
//! reached its current status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::depth::Depth;

/// Kind-specific payload of a history event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EventKind {
    /// A check run touched this feature.
    CheckRun {
        depth: Depth,
        passed: usize,
        failed: usize,
        timed_out: usize,
    },
    /// A checklist item was flipped.
    ChecklistToggle { item: String, completed: bool },
    /// Explicit human verification.
    HumanVerify,
    /// Explicit revocation with a reason.
    Invalidate { reason: String },
    /// Free-form annotation; never changes status.
    NoteAdded { note: String },
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::CheckRun { .. } => "check-run",
            EventKind::ChecklistToggle { .. } => "checklist-toggle",
            EventKind::HumanVerify => "human-verify",
            EventKind::Invalidate { .. } => "invalidate",
            EventKind::NoteAdded { .. } => "note-added",
        }
    }
}

/// One immutable audit record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEvent {
    pub id: String,
    pub at: DateTime<Utc>,
    /// Who triggered the event (a human identity, or "runner" for check runs).
    pub actor: String,
    #[serde(flatten)]
    pub kind: EventKind,
    /// Status label before the event was applied.
    pub from: String,
    /// Status label after the event was applied.
    pub to: String,
}

impl HistoryEvent {
    pub fn new(actor: &str, kind: EventKind, from: &str, to: &str, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            at,
            actor: actor.to_string(),
            kind,
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
