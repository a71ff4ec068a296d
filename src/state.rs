//! Authoritative status state machine
//!
//! Every status change funnels through this module: check-run reports,
//! checklist-driven recomputation, and explicit human actions. Each applied
//! transition appends exactly one history event with the prior and new
//! status labels. No other code path mutates `Feature::status` or
//! `Feature::history`.

use chrono::{DateTime, Utc};

use crate::error::AttestError;
use crate::models::{
    CheckOutcome, Depth, EventKind, Feature, HistoryEvent, MachineState, VerificationStatus,
    CHECKLIST_ACTOR,
};
use crate::runner::report::FeatureRunReport;

/// Actor recorded on events produced by check runs.
pub const RUNNER_ACTOR: &str = "runner";

/// Recompute the signal-derived status family for a feature.
///
/// Sticky states (`HumanVerified`, `Invalidated`) are returned unchanged;
/// only explicit actions move them. Otherwise:
/// - all checklist items complete (and at least one exists) → `ChecklistVerified`
/// - some items complete → `PartiallyChecklisted`
/// - no checklist signal, machine checks all passing → `MachineVerified`
/// - nothing known → `Untested`
pub fn rederive(feature: &Feature, now: DateTime<Utc>) -> VerificationStatus {
    if feature.status.is_sticky() {
        return feature.status.clone();
    }

    let total = feature.checklist.len();
    let complete = feature.completed_items();

    if total > 0 && complete == total {
        // Keep the original verification timestamp when already verified.
        if let VerificationStatus::ChecklistVerified { .. } = feature.status {
            return feature.status.clone();
        }
        return VerificationStatus::ChecklistVerified {
            verified_by: CHECKLIST_ACTOR.to_string(),
            at: now,
        };
    }

    if complete > 0 {
        return VerificationStatus::PartiallyChecklisted { complete, total };
    }

    if feature.machine_passing() {
        if let VerificationStatus::MachineVerified { .. } = feature.status {
            return feature.status.clone();
        }
        return VerificationStatus::MachineVerified { at: now };
    }

    VerificationStatus::Untested
}

/// Apply a check-run report to a feature: record machine state for every
/// check that actually ran, re-derive the status, and append one
/// `check-run` event. A report with nothing due leaves the feature
/// completely untouched.
pub fn apply_check_report(
    feature: &mut Feature,
    report: &FeatureRunReport,
    depth: Depth,
    now: DateTime<Utc>,
) {
    if report.outcomes.is_empty() {
        return;
    }

    for run in &report.outcomes {
        if let Some(check) = feature.checks.iter_mut().find(|c| c.id == run.check_id) {
            check.state.insert(
                depth,
                MachineState {
                    outcome: run.outcome,
                    at: now,
                    detail: run.detail.clone(),
                },
            );
        }
    }

    let from = feature.status.label();
    let new_status = rederive(feature, now);
    let event = HistoryEvent::new(
        RUNNER_ACTOR,
        EventKind::CheckRun {
            depth,
            passed: report.count(CheckOutcome::Pass),
            failed: report.count(CheckOutcome::Fail),
            timed_out: report.count(CheckOutcome::Timeout),
        },
        from,
        new_status.label(),
        now,
    );
    feature.status = new_status;
    feature.record_event(event);
}

/// Re-derive after a checklist edit and append the `checklist-toggle`
/// event. This is the one transition that fires as an automatic side
/// effect of an otherwise unrelated action: toggling any item off a
/// `ChecklistVerified` feature immediately leaves that state.
pub fn apply_checklist_change(
    feature: &mut Feature,
    item_id: &str,
    completed: bool,
    actor: &str,
    now: DateTime<Utc>,
) {
    let from = feature.status.label();
    let new_status = rederive(feature, now);
    let event = HistoryEvent::new(
        actor,
        EventKind::ChecklistToggle {
            item: item_id.to_string(),
            completed,
        },
        from,
        new_status.label(),
        now,
    );
    feature.status = new_status;
    feature.record_event(event);
}

/// Explicit human verification. Moves any state, including `Invalidated`,
/// to `HumanVerified`; subsequent checklist edits do not revert it.
pub fn human_verify(
    feature: &mut Feature,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<(), AttestError> {
    if actor.trim().is_empty() {
        return Err(AttestError::InvalidTransition(
            "human verification requires an identified actor".to_string(),
        ));
    }

    let from = feature.status.label();
    let new_status = VerificationStatus::HumanVerified {
        verified_by: actor.to_string(),
        at: now,
    };
    let event = HistoryEvent::new(actor, EventKind::HumanVerify, from, new_status.label(), now);
    feature.status = new_status;
    feature.record_event(event);
    Ok(())
}

/// Explicit revocation. Rejected before any mutation when the reason is
/// empty; terminal until an explicit re-verification.
pub fn invalidate(
    feature: &mut Feature,
    actor: &str,
    reason: &str,
    now: DateTime<Utc>,
) -> Result<(), AttestError> {
    if reason.trim().is_empty() {
        return Err(AttestError::InvalidTransition(
            "invalidate requires a non-empty reason".to_string(),
        ));
    }
    if actor.trim().is_empty() {
        return Err(AttestError::InvalidTransition(
            "invalidate requires an identified actor".to_string(),
        ));
    }

    let from = feature.status.label();
    let new_status = VerificationStatus::Invalidated {
        by: actor.to_string(),
        reason: reason.to_string(),
        at: now,
    };
    let event = HistoryEvent::new(
        actor,
        EventKind::Invalidate {
            reason: reason.to_string(),
        },
        from,
        new_status.label(),
        now,
    );
    feature.status = new_status;
    feature.record_event(event);
    Ok(())
}

/// Re-derive after an inventory edit changed the declared checklist or
/// checks. Status changes caused by a sync are audited with a note event;
/// a sync that leaves the status family unchanged appends nothing.
pub fn resync(feature: &mut Feature, now: DateTime<Utc>) {
    let from = feature.status.label();
    let new_status = rederive(feature, now);
    let changed = new_status.label() != from;
    feature.status = new_status;
    if changed {
        let to = feature.status.label();
        let event = HistoryEvent::new(
            "inventory",
            EventKind::NoteAdded {
                note: "status re-derived after inventory sync".to_string(),
            },
            from,
            to,
            now,
        );
        feature.record_event(event);
    }
}

/// Append a free-form note. Never changes status.
pub fn add_note(feature: &mut Feature, actor: &str, note: &str, now: DateTime<Utc>) {
    let label = feature.status.label();
    let event = HistoryEvent::new(
        actor,
        EventKind::NoteAdded {
            note: note.to_string(),
        },
        label,
        label,
        now,
    );
    feature.record_event(event);
}
