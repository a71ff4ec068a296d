//! Structured check-run reports
//!
//! The runner reports outcomes; it never decides a feature's overall
//! status. The state machine consumes these reports.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::{CheckOutcome, Depth};

/// Outcome of one executed check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckRunOutcome {
    pub check_id: String,
    pub outcome: CheckOutcome,
    pub duration: Duration,
    /// Captured error or truncated stderr for non-passing probes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Per-feature rollup of check outcomes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RunAggregate {
    AllPassed,
    SomeFailed,
    SomeTimedOut,
    /// No check on this feature was due at the requested depth.
    NothingDue,
}

/// All outcomes for one feature in a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureRunReport {
    pub feature_id: String,
    pub outcomes: Vec<CheckRunOutcome>,
}

impl FeatureRunReport {
    pub fn aggregate(&self) -> RunAggregate {
        if self.outcomes.is_empty() {
            return RunAggregate::NothingDue;
        }
        // Timeouts dominate failures in the rollup so a stuck probe is
        // visible even among ordinary failures.
        if self
            .outcomes
            .iter()
            .any(|o| o.outcome == CheckOutcome::Timeout)
        {
            RunAggregate::SomeTimedOut
        } else if self.outcomes.iter().any(|o| o.outcome == CheckOutcome::Fail) {
            RunAggregate::SomeFailed
        } else {
            RunAggregate::AllPassed
        }
    }

    pub fn count(&self, outcome: CheckOutcome) -> usize {
        self.outcomes.iter().filter(|o| o.outcome == outcome).count()
    }

    pub fn all_passed(&self) -> bool {
        matches!(self.aggregate(), RunAggregate::AllPassed)
    }
}

/// Full report for one invocation of the runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub depth: Depth,
    pub features: Vec<FeatureRunReport>,
}

impl RunReport {
    pub fn total_checks(&self) -> usize {
        self.features.iter().map(|f| f.outcomes.len()).sum()
    }

    pub fn passed(&self) -> usize {
        self.features
            .iter()
            .map(|f| f.count(CheckOutcome::Pass))
            .sum()
    }

    pub fn failed(&self) -> usize {
        self.features
            .iter()
            .map(|f| f.count(CheckOutcome::Fail))
            .sum()
    }

    pub fn timed_out(&self) -> usize {
        self.features
            .iter()
            .map(|f| f.count(CheckOutcome::Timeout))
            .sum()
    }

    /// True when every executed check passed. A run with nothing due is
    /// clean by definition.
    pub fn is_clean(&self) -> bool {
        self.failed() == 0 && self.timed_out() == 0
    }
}
