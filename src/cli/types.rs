use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "attest")]
#[command(about = "Layered feature-verification tracker", long_about = None)]
#[command(version)]
#[command(subcommand_help_heading = "Commands")]
pub struct Cli {
    /// Store directory holding the verification record
    #[arg(long, default_value = ".attest", global = true)]
    pub dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sync the feature inventory declaration into the record
    Sync {
        /// Path to the inventory YAML file
        inventory: PathBuf,
    },

    /// Run machine checks for a scope at a depth
    Run {
        /// Scope: all, feature:<id>, or category:<name>
        #[arg(short, long, default_value = "all")]
        scope: String,

        /// Depth: basic, standard, thorough, or paranoid
        #[arg(short, long)]
        depth: Option<String>,

        /// Per-check timeout override in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Maximum features checked in parallel
        #[arg(short = 'p', long)]
        max_parallel: Option<usize>,
    },

    /// Show verification status
    Status {
        /// Show one feature in detail
        feature: Option<String>,
    },

    /// Toggle a checklist item on a feature
    Check {
        /// Feature ID
        feature: String,

        /// Checklist item ID
        item: String,

        /// Acting identity (defaults to config, then $USER)
        #[arg(long)]
        actor: Option<String>,
    },

    /// Explicitly verify a feature as a human
    Verify {
        /// Feature ID
        feature: String,

        /// Acting identity (defaults to config, then $USER)
        #[arg(long)]
        actor: Option<String>,
    },

    /// Revoke a feature's verification with a reason
    Invalidate {
        /// Feature ID
        feature: String,

        /// Why the verification no longer holds
        #[arg(short, long)]
        reason: String,

        /// Acting identity (defaults to config, then $USER)
        #[arg(long)]
        actor: Option<String>,
    },

    /// Attach a free-form note to a feature's history
    Note {
        /// Feature ID
        feature: String,

        /// Note text
        text: String,

        /// Acting identity (defaults to config, then $USER)
        #[arg(long)]
        actor: Option<String>,
    },

    /// Show a feature's audit history
    History {
        /// Feature ID
        feature: String,
    },

    /// Emit the aggregate badge document
    Badge {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
