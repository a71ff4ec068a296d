//! Optional store configuration
//!
//! `config.toml` inside the store directory sets defaults the CLI flags
//! can override. A missing file means defaults everywhere.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::models::Depth;
use crate::runner::DEFAULT_MAX_PARALLEL;

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub default_depth: Option<Depth>,
    #[serde(default)]
    pub max_parallel: Option<usize>,
    #[serde(default)]
    pub default_actor: Option<String>,
    /// Global per-check timeout override, in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn load(store_dir: &Path) -> Result<Self> {
        let path = store_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    pub fn depth_or_default(&self) -> Depth {
        self.default_depth.unwrap_or(Depth::Standard)
    }

    pub fn max_parallel_or_default(&self) -> usize {
        self.max_parallel.unwrap_or(DEFAULT_MAX_PARALLEL)
    }

    /// Actor resolution order: explicit flag, config, then the invoking
    /// user's identity from the environment.
    pub fn resolve_actor(&self, flag: Option<&str>) -> String {
        if let Some(actor) = flag {
            return actor.to_string();
        }
        if let Some(actor) = &self.default_actor {
            return actor.clone();
        }
        std::env::var("USER").unwrap_or_else(|_| "unknown".to_string())
    }
}
