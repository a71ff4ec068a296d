//! Error taxonomy
//!
//! Persistence and schema errors are fatal and abort the current command;
//! per-check errors are classified into recorded outcomes and never abort
//! the broader run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttestError {
    /// Persisted record cannot be parsed as any known schema version. Fatal.
    #[error("record at {path} is not readable as any known schema version: {detail}")]
    SchemaCorrupt { path: PathBuf, detail: String },

    /// Record target is not writable. Fatal; the prior on-disk state is
    /// left untouched by the atomic replace.
    #[error("cannot write record to {path}: {source}")]
    StoreWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A probe errored before producing a verdict. Recorded as `Fail` with
    /// the error captured; never fatal to the run.
    #[error("check probe errored: {0}")]
    CheckExecution(String),

    /// A probe exceeded its depth-derived time budget. Recorded as
    /// `Timeout`; never fatal to the run.
    #[error("check probe exceeded {0:?} time budget")]
    CheckTimeout(std::time::Duration),

    /// A requested transition is rejected before any mutation occurs.
    #[error("invalid state transition: {0}")]
    InvalidTransition(String),

    /// The record changed on disk between load and save. Surfaced as a
    /// warning; without locking the last write wins.
    #[error("record changed on disk since load (revision {loaded} on load, {found} on save)")]
    StoreWriteConflict { loaded: u64, found: u64 },
}
