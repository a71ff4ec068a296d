//! End-to-end checklist verification lifecycle through the persisted store

use chrono::Utc;

use attest::checklist;
use attest::state;

use super::helpers::{load, seeded_store, store_at};

#[test]
fn test_checklist_walk_persists_across_reloads() {
    let temp = seeded_store();

    // None complete: untested.
    let mut record = load(temp.path());
    assert_eq!(record.find_feature("backup").unwrap().status.label(), "untested");

    // Complete one item, save, reload.
    let feature = record.find_feature_mut("backup").unwrap();
    checklist::toggle(feature, "restore-completes", "alice", Utc::now()).unwrap();
    let mut store = store_at(temp.path());
    store.save(&mut record).unwrap();

    let mut record = load(temp.path());
    let feature = record.find_feature_mut("backup").unwrap();
    assert_eq!(feature.status.label(), "partially-checklisted");

    // Complete the rest: checklist-verified by "checklist".
    checklist::toggle(feature, "data-intact-after-restore", "alice", Utc::now()).unwrap();
    checklist::toggle(feature, "permissions-preserved", "bob", Utc::now()).unwrap();
    match &feature.status {
        attest::models::VerificationStatus::ChecklistVerified { verified_by, .. } => {
            assert_eq!(verified_by, "checklist");
        }
        other => panic!("expected checklist-verified, got {other:?}"),
    }

    // Toggling one off immediately leaves checklist-verified.
    let status =
        checklist::toggle(feature, "data-intact-after-restore", "alice", Utc::now()).unwrap();
    assert_eq!(status.label(), "partially-checklisted");

    // Every toggle audited, in order.
    assert_eq!(
        feature
            .history
            .iter()
            .filter(|e| e.kind.label() == "checklist-toggle")
            .count(),
        4
    );
    let last = feature.history.last().unwrap();
    assert_eq!(last.from, "checklist-verified");
    assert_eq!(last.to, "partially-checklisted");
}

#[test]
fn test_human_verification_survives_checklist_edits() {
    let temp = seeded_store();
    let mut record = load(temp.path());

    let feature = record.find_feature_mut("backup").unwrap();
    state::human_verify(feature, "alice", Utc::now()).unwrap();
    checklist::toggle(feature, "restore-completes", "bob", Utc::now()).unwrap();
    checklist::toggle(feature, "restore-completes", "bob", Utc::now()).unwrap();
    assert_eq!(feature.status.label(), "human-verified");

    store_at(temp.path()).save(&mut record).unwrap();
    let record = load(temp.path());
    assert_eq!(record.find_feature("backup").unwrap().status.label(), "human-verified");
}

#[test]
fn test_invalidate_without_reason_leaves_record_untouched() {
    let temp = seeded_store();
    let mut record = load(temp.path());

    let feature = record.find_feature_mut("backup").unwrap();
    state::human_verify(feature, "alice", Utc::now()).unwrap();
    store_at(temp.path()).save(&mut record).unwrap();

    let mut record = load(temp.path());
    let feature = record.find_feature_mut("backup").unwrap();
    let result = state::invalidate(feature, "bob", "", Utc::now());
    assert!(result.is_err());
    assert_eq!(feature.status.label(), "human-verified");

    // Nothing was persisted; the stored status is unchanged too.
    let record = load(temp.path());
    assert_eq!(record.find_feature("backup").unwrap().status.label(), "human-verified");
}

#[test]
fn test_invalidated_feature_requires_explicit_reverification() {
    let temp = seeded_store();
    let mut record = load(temp.path());

    let feature = record.find_feature_mut("backup").unwrap();
    state::invalidate(feature, "bob", "restore corrupted symlinks", Utc::now()).unwrap();

    // Completing the whole checklist does not resurrect it.
    checklist::toggle(feature, "restore-completes", "alice", Utc::now()).unwrap();
    checklist::toggle(feature, "data-intact-after-restore", "alice", Utc::now()).unwrap();
    checklist::toggle(feature, "permissions-preserved", "alice", Utc::now()).unwrap();
    assert_eq!(feature.status.label(), "invalidated");

    state::human_verify(feature, "alice", Utc::now()).unwrap();
    assert_eq!(feature.status.label(), "human-verified");
}
