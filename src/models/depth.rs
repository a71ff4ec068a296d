//! Check execution depth levels
//!
//! Depth controls which machine checks run and how long each probe is
//! allowed to take before it is cancelled and recorded as timed out.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ordered thoroughness level for a check run.
///
/// A check declares the minimum depth at which it participates; a run at
/// depth D executes every check whose minimum depth is <= D.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    /// Quick smoke probes.
    Basic,
    /// Default everyday level.
    Standard,
    /// Slower, more exhaustive probes.
    Thorough,
    /// Everything, including long-running probes.
    Paranoid,
}

impl Depth {
    /// Per-probe time budget at this depth.
    pub fn timeout(&self) -> Duration {
        match self {
            Depth::Basic => Duration::from_secs(10),
            Depth::Standard => Duration::from_secs(20),
            Depth::Thorough => Duration::from_secs(40),
            Depth::Paranoid => Duration::from_secs(300),
        }
    }

    /// All depths in ascending order.
    pub fn all() -> [Depth; 4] {
        [
            Depth::Basic,
            Depth::Standard,
            Depth::Thorough,
            Depth::Paranoid,
        ]
    }
}

impl std::fmt::Display for Depth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Depth::Basic => write!(f, "basic"),
            Depth::Standard => write!(f, "standard"),
            Depth::Thorough => write!(f, "thorough"),
            Depth::Paranoid => write!(f, "paranoid"),
        }
    }
}

impl std::str::FromStr for Depth {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Depth::Basic),
            "standard" => Ok(Depth::Standard),
            "thorough" => Ok(Depth::Thorough),
            "paranoid" => Ok(Depth::Paranoid),
            _ => anyhow::bail!(
                "Invalid depth: {s}. Valid values: basic, standard, thorough, paranoid"
            ),
        }
    }
}
