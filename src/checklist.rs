//! Checklist engine
//!
//! Tracks human-attestable checklist items and derives the
//! checklist-driven verification signal. All status consequences are
//! delegated to the state machine so the auto-unverify rule cannot be
//! bypassed.

use chrono::{DateTime, Utc};

use crate::error::AttestError;
use crate::models::{Feature, VerificationStatus};
use crate::state;

/// Flip one checklist item. Turning an item on stamps `completed_by` and
/// `completed_at`; turning it off clears both. The state machine then
/// re-derives the feature's status and appends the toggle event.
///
/// Returns the feature's status after the toggle.
pub fn toggle(
    feature: &mut Feature,
    item_id: &str,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<VerificationStatus, AttestError> {
    if actor.trim().is_empty() {
        return Err(AttestError::InvalidTransition(
            "checklist toggle requires an identified actor".to_string(),
        ));
    }

    let item = feature.find_item_mut(item_id).ok_or_else(|| {
        AttestError::InvalidTransition(format!(
            "feature has no checklist item '{item_id}'"
        ))
    })?;

    item.completed = !item.completed;
    let completed = item.completed;
    if completed {
        item.completed_by = Some(actor.to_string());
        item.completed_at = Some(now);
    } else {
        item.completed_by = None;
        item.completed_at = None;
    }

    state::apply_checklist_change(feature, item_id, completed, actor, now);
    Ok(feature.status.clone())
}

/// Pure query: true iff the feature has checklist items and every one is
/// completed. Recomputed on demand, never cached.
pub fn is_fully_complete(feature: &Feature) -> bool {
    !feature.checklist.is_empty() && feature.checklist.iter().all(|i| i.completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChecklistItem;

    fn feature_with_items(texts: &[&str]) -> Feature {
        let mut feature = Feature::new("backup", "setup", "Backups restore cleanly");
        for text in texts {
            feature.checklist.push(ChecklistItem::new(text));
        }
        feature
    }

    #[test]
    fn test_toggle_on_stamps_identity() {
        let mut feature = feature_with_items(&["restore completes"]);
        toggle(&mut feature, "restore-completes", "alice", Utc::now()).unwrap();

        let item = &feature.checklist[0];
        assert!(item.completed);
        assert_eq!(item.completed_by.as_deref(), Some("alice"));
        assert!(item.completed_at.is_some());
    }

    #[test]
    fn test_toggle_off_clears_identity() {
        let mut feature = feature_with_items(&["restore completes"]);
        toggle(&mut feature, "restore-completes", "alice", Utc::now()).unwrap();
        toggle(&mut feature, "restore-completes", "bob", Utc::now()).unwrap();

        let item = &feature.checklist[0];
        assert!(!item.completed);
        assert!(item.completed_by.is_none());
        assert!(item.completed_at.is_none());
    }

    #[test]
    fn test_unknown_item_rejected_without_mutation() {
        let mut feature = feature_with_items(&["restore completes"]);
        let result = toggle(&mut feature, "no-such-item", "alice", Utc::now());
        assert!(result.is_err());
        assert!(feature.history.is_empty());
        assert!(!feature.checklist[0].completed);
    }

    #[test]
    fn test_full_checklist_scenario() {
        // 3 items, none complete -> untested.
        let mut feature = feature_with_items(&["item one", "item two", "item three"]);
        assert_eq!(feature.status.label(), "untested");

        // Complete item 1 -> partially-checklisted.
        let status = toggle(&mut feature, "item-one", "alice", Utc::now()).unwrap();
        assert_eq!(status.label(), "partially-checklisted");

        // Complete items 2 and 3 -> checklist-verified by "checklist".
        toggle(&mut feature, "item-two", "alice", Utc::now()).unwrap();
        let status = toggle(&mut feature, "item-three", "alice", Utc::now()).unwrap();
        match status {
            VerificationStatus::ChecklistVerified { ref verified_by, .. } => {
                assert_eq!(verified_by, "checklist");
            }
            other => panic!("expected checklist-verified, got {other:?}"),
        }
        assert!(is_fully_complete(&feature));

        // Uncomplete item 2 -> reverts to partially-checklisted.
        let status = toggle(&mut feature, "item-two", "alice", Utc::now()).unwrap();
        assert_eq!(
            status,
            VerificationStatus::PartiallyChecklisted {
                complete: 2,
                total: 3
            }
        );
        assert!(!is_fully_complete(&feature));

        // One history event per toggle.
        assert_eq!(feature.history.len(), 4);
        assert!(feature
            .history
            .iter()
            .all(|e| e.kind.label() == "checklist-toggle"));
    }

    #[test]
    fn test_checklist_verified_iff_fully_complete() {
        let mut feature = feature_with_items(&["a", "b"]);
        toggle(&mut feature, "a", "alice", Utc::now()).unwrap();
        toggle(&mut feature, "b", "alice", Utc::now()).unwrap();
        assert_eq!(
            is_fully_complete(&feature),
            feature.status.label() == "checklist-verified"
        );

        toggle(&mut feature, "a", "alice", Utc::now()).unwrap();
        assert_eq!(
            is_fully_complete(&feature),
            feature.status.label() == "checklist-verified"
        );
    }

    #[test]
    fn test_human_verified_unaffected_by_toggles() {
        let mut feature = feature_with_items(&["a", "b"]);
        crate::state::human_verify(&mut feature, "alice", Utc::now()).unwrap();

        toggle(&mut feature, "a", "bob", Utc::now()).unwrap();
        toggle(&mut feature, "a", "bob", Utc::now()).unwrap();

        assert_eq!(feature.status.label(), "human-verified");
        // Toggles still audited even though status is sticky.
        assert_eq!(
            feature
                .history
                .iter()
                .filter(|e| e.kind.label() == "checklist-toggle")
                .count(),
            2
        );
    }

    #[test]
    fn test_empty_checklist_is_never_fully_complete() {
        let feature = feature_with_items(&[]);
        assert!(!is_fully_complete(&feature));
    }
}
