use anyhow::Result;

use crate::commands::{badge, check, history, invalidate, note, run, status, sync, verify};

use super::types::{Cli, Commands};

/// Exit code for a run that completed but saw check failures or timeouts.
pub const EXIT_COMPLETED_WITH_FAILURES: i32 = 2;

/// Route a parsed invocation to its command. Returns the process exit
/// code for non-fatal completion; fatal errors propagate as `Err`.
pub fn dispatch(cli: Cli) -> Result<i32> {
    let dir = cli.dir;
    match cli.command {
        Commands::Sync { inventory } => {
            sync::execute(&dir, &inventory)?;
            Ok(0)
        }
        Commands::Run {
            scope,
            depth,
            timeout_secs,
            max_parallel,
        } => {
            let clean = run::execute(&dir, &scope, depth.as_deref(), timeout_secs, max_parallel)?;
            Ok(if clean { 0 } else { EXIT_COMPLETED_WITH_FAILURES })
        }
        Commands::Status { feature } => {
            status::execute(&dir, feature.as_deref())?;
            Ok(0)
        }
        Commands::Check {
            feature,
            item,
            actor,
        } => {
            check::execute(&dir, &feature, &item, actor.as_deref())?;
            Ok(0)
        }
        Commands::Verify { feature, actor } => {
            verify::execute(&dir, &feature, actor.as_deref())?;
            Ok(0)
        }
        Commands::Invalidate {
            feature,
            reason,
            actor,
        } => {
            invalidate::execute(&dir, &feature, &reason, actor.as_deref())?;
            Ok(0)
        }
        Commands::Note {
            feature,
            text,
            actor,
        } => {
            note::execute(&dir, &feature, &text, actor.as_deref())?;
            Ok(0)
        }
        Commands::History { feature } => {
            history::execute(&dir, &feature)?;
            Ok(0)
        }
        Commands::Badge { output } => {
            badge::execute(&dir, output.as_deref())?;
            Ok(0)
        }
    }
}
