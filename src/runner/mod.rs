//! Check runner
//!
//! Executes the machine checks for a requested scope at a requested depth
//! and feeds per-feature reports into the state machine. Features run
//! concurrently on a bounded worker pool; checks within one feature run
//! sequentially in declaration order (later checks may assume earlier
//! setup completed). The runner never decides a feature's overall status.

pub mod executor;
pub mod report;

pub use executor::{ProbeExecutor, ProbeResult, ShellProbe};
pub use report::{CheckRunOutcome, FeatureRunReport, RunAggregate, RunReport};

use chrono::Utc;
use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use crate::models::Depth;
use crate::state;
use crate::store::Record;

pub const DEFAULT_MAX_PARALLEL: usize = 4;

/// Which features a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    Feature(String),
    Category(String),
}

impl Scope {
    pub fn matches(&self, feature_id: &str, category: &str) -> bool {
        match self {
            Scope::All => true,
            Scope::Feature(id) => id == feature_id,
            Scope::Category(c) => c == category,
        }
    }
}

impl std::str::FromStr for Scope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Scope::All);
        }
        if let Some(id) = s.strip_prefix("feature:") {
            return Ok(Scope::Feature(id.to_string()));
        }
        if let Some(c) = s.strip_prefix("category:") {
            return Ok(Scope::Category(c.to_string()));
        }
        anyhow::bail!("Invalid scope: {s}. Valid forms: all, feature:<id>, category:<name>")
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::All => write!(f, "all"),
            Scope::Feature(id) => write!(f, "feature:{id}"),
            Scope::Category(c) => write!(f, "category:{c}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub scope: Scope,
    pub depth: Depth,
    /// Overrides the depth-derived per-check budget when set.
    pub timeout: Option<Duration>,
    pub max_parallel: usize,
}

impl RunOptions {
    pub fn new(scope: Scope, depth: Depth) -> Self {
        Self {
            scope,
            depth,
            timeout: None,
            max_parallel: DEFAULT_MAX_PARALLEL,
        }
    }

    fn check_timeout(&self) -> Duration {
        self.timeout.unwrap_or_else(|| self.depth.timeout())
    }
}

/// One feature's due checks, detached from the record for the worker pool.
struct WorkItem {
    feature_id: String,
    checks: Vec<(String, String)>,
}

/// Run all due checks in scope and apply the outcomes through the state
/// machine. Returns the structured run report.
pub fn run_checks(
    record: &mut Record,
    opts: &RunOptions,
    executor: &dyn ProbeExecutor,
) -> RunReport {
    let items: Vec<WorkItem> = record
        .active_features()
        .filter(|f| opts.scope.matches(&f.id, &f.category))
        .map(|f| WorkItem {
            feature_id: f.id.clone(),
            checks: f
                .due_checks(opts.depth)
                .iter()
                .map(|c| (c.id.clone(), c.command.clone()))
                .collect(),
        })
        .collect();

    let order: Vec<String> = items.iter().map(|i| i.feature_id.clone()).collect();
    let reports = execute_pool(items, opts, executor);

    // Outcomes are applied sequentially after the pool joins, so updates
    // to any one feature never interleave.
    let mut ordered = Vec::with_capacity(order.len());
    for feature_id in order {
        let Some(feature_report) = reports.iter().find(|r| r.feature_id == feature_id) else {
            continue;
        };
        if let Some(feature) = record.find_feature_mut(&feature_id) {
            state::apply_check_report(feature, feature_report, opts.depth, Utc::now());
        }
        ordered.push(feature_report.clone());
    }

    let report = RunReport {
        depth: opts.depth,
        features: ordered,
    };
    tracing::debug!(
        checks = report.total_checks(),
        passed = report.passed(),
        failed = report.failed(),
        timed_out = report.timed_out(),
        "check run complete"
    );
    report
}

/// Execute work items on up to `max_parallel` worker threads pulling from
/// a shared queue. A timed-out or failed check never aborts sibling
/// checks or other features.
fn execute_pool(
    items: Vec<WorkItem>,
    opts: &RunOptions,
    executor: &dyn ProbeExecutor,
) -> Vec<FeatureRunReport> {
    let workers = opts.max_parallel.max(1).min(items.len().max(1));
    let timeout = opts.check_timeout();
    let queue = Mutex::new(items.into_iter().collect::<VecDeque<WorkItem>>());
    let (tx, rx) = mpsc::channel::<FeatureRunReport>();

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let queue = &queue;
            scope.spawn(move || loop {
                let Some(item) = queue.lock().ok().and_then(|mut q| q.pop_front()) else {
                    break;
                };
                let outcomes = item
                    .checks
                    .iter()
                    .map(|(check_id, command)| {
                        let result = executor.execute(command, timeout);
                        CheckRunOutcome {
                            check_id: check_id.clone(),
                            outcome: result.outcome,
                            duration: result.duration,
                            detail: result.detail,
                        }
                    })
                    .collect();
                let _ = tx.send(FeatureRunReport {
                    feature_id: item.feature_id,
                    outcomes,
                });
            });
        }
        drop(tx);
    });

    rx.into_iter().collect()
}
