//! Check-run flows with the real shell probe against the persisted store

use attest::models::Depth;
use attest::runner::{run_checks, RunOptions, Scope, ShellProbe};

use super::helpers::{load, seeded_store, store_at};

#[test]
fn test_basic_run_skips_standard_depth_check() {
    let temp = seeded_store();
    let mut record = load(temp.path());

    let report = run_checks(
        &mut record,
        &RunOptions::new(Scope::Feature("gateway".to_string()), Depth::Basic),
        &ShellProbe::new(),
    );
    assert_eq!(report.total_checks(), 0);

    let gateway = record.find_feature("gateway").unwrap();
    assert!(gateway.checks[0].state.is_empty());
    assert_eq!(gateway.status.label(), "untested");
}

#[test]
fn test_standard_run_machine_verifies_passing_feature() {
    let temp = seeded_store();
    let mut record = load(temp.path());

    let report = run_checks(
        &mut record,
        &RunOptions::new(Scope::Feature("gateway".to_string()), Depth::Standard),
        &ShellProbe::new(),
    );
    assert_eq!(report.total_checks(), 1);
    assert!(report.is_clean());

    store_at(temp.path()).save(&mut record).unwrap();
    let record = load(temp.path());
    let gateway = record.find_feature("gateway").unwrap();
    assert_eq!(gateway.status.label(), "machine-verified");
    assert!(gateway.machine_passing());
    assert_eq!(gateway.history.len(), 1);
    assert_eq!(gateway.history[0].kind.label(), "check-run");
}

#[test]
fn test_failing_check_reported_not_fatal() {
    let temp = seeded_store();
    let mut record = load(temp.path());

    let report = run_checks(
        &mut record,
        &RunOptions::new(Scope::All, Depth::Standard),
        &ShellProbe::new(),
    );
    // gateway passes, tls fails; the run still completes.
    assert_eq!(report.passed(), 1);
    assert_eq!(report.failed(), 1);
    assert!(!report.is_clean());

    let tls = record.find_feature("tls").unwrap();
    assert_eq!(tls.status.label(), "untested");
    assert!(!tls.machine_passing());
    let detail = tls.checks[0]
        .state
        .values()
        .next()
        .unwrap()
        .detail
        .as_deref()
        .unwrap();
    assert!(detail.contains("exit code 1"));
}

#[test]
fn test_rerun_yields_identical_outcomes() {
    let temp = seeded_store();
    let mut record = load(temp.path());
    let opts = RunOptions::new(Scope::All, Depth::Standard);

    let first = run_checks(&mut record, &opts, &ShellProbe::new());
    let second = run_checks(&mut record, &opts, &ShellProbe::new());

    let shape = |r: &attest::runner::RunReport| {
        r.features
            .iter()
            .map(|f| (f.feature_id.clone(), f.aggregate(), f.outcomes.len()))
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(&first), shape(&second));
    assert_eq!(first.passed(), second.passed());
    assert_eq!(first.failed(), second.failed());
    assert_eq!(first.timed_out(), second.timed_out());
}

#[test]
fn test_run_scope_rejects_unknown_feature() {
    let temp = seeded_store();
    let err = attest::commands::run::execute(
        &temp.path().join(".attest"),
        "feature:nope",
        Some("standard"),
        None,
        None,
    )
    .unwrap_err();
    assert!(err.to_string().contains("Unknown feature 'nope'"));
}

#[test]
fn test_run_scope_rejects_retired_feature() {
    let temp = seeded_store();
    let mut record = load(temp.path());
    record.find_feature_mut("tls").unwrap().retired = true;
    store_at(temp.path()).save(&mut record).unwrap();

    let err = attest::commands::run::execute(
        &temp.path().join(".attest"),
        "feature:tls",
        Some("standard"),
        None,
        None,
    )
    .unwrap_err();
    assert!(err.to_string().contains("retired"));
}

#[test]
fn test_machine_signal_coexists_with_missing_human_confirmation() {
    let temp = seeded_store();
    let mut record = load(temp.path());

    run_checks(
        &mut record,
        &RunOptions::new(Scope::Feature("gateway".to_string()), Depth::Standard),
        &ShellProbe::new(),
    );

    let gateway = record.find_feature("gateway").unwrap();
    // Machine passing, yet not counted as confirmed by the aggregator.
    assert!(gateway.machine_passing());
    let report = attest::badge::aggregate(&record);
    assert_eq!(report.categories["network"].machine_only, 1);
    assert_eq!(report.categories["network"].confirmed, 0);
}
