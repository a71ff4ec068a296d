//! Record store
//!
//! Durable, versioned persistence of the feature inventory. Loads branch
//! on the record's explicit schema version and migrate forward; saves are
//! atomic (write-to-temp-then-replace) so a crash mid-write cannot leave a
//! truncated record. At most one writer process is assumed; stale writes
//! are detected via the record's revision counter and surfaced as a
//! warning (last write wins).

pub mod migrations;
pub mod schema;

pub use schema::{Record, SCHEMA_VERSION};

use anyhow::{Context, Result};
use chrono::Utc;
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::AttestError;
use crate::store::migrations::{v1_to_v2, v2_to_v3};
use crate::store::schema::{RecordV1, RecordV2};

const RECORD_FILE: &str = "record.json";
const LOCK_FILE: &str = "record.lock";

/// Handle on one on-disk store directory.
pub struct Store {
    dir: PathBuf,
    /// Revision observed at load time, used to detect writes that raced us.
    loaded_revision: Option<u64>,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            loaded_revision: None,
        }
    }

    pub fn record_path(&self) -> PathBuf {
        self.dir.join(RECORD_FILE)
    }

    fn lock_path(&self) -> PathBuf {
        self.dir.join(LOCK_FILE)
    }

    pub fn exists(&self) -> bool {
        self.record_path().exists()
    }

    /// Load the persisted record, migrating forward to the current schema.
    pub fn load(&mut self) -> Result<Record> {
        let path = self.record_path();
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read record: {}", path.display()))?;
        let record = self.parse(&path, &content)?;
        self.loaded_revision = Some(record.revision);
        Ok(record)
    }

    /// Load if a record exists, otherwise start from an empty one.
    pub fn load_or_init(&mut self) -> Result<Record> {
        if self.exists() {
            self.load()
        } else {
            self.loaded_revision = Some(0);
            Ok(Record::new())
        }
    }

    fn parse(&self, path: &Path, content: &str) -> Result<Record> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| AttestError::SchemaCorrupt {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;

        let version = value
            .get("schema_version")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| AttestError::SchemaCorrupt {
                path: path.to_path_buf(),
                detail: "missing schema_version field".to_string(),
            })?;

        let corrupt = |e: serde_json::Error| AttestError::SchemaCorrupt {
            path: path.to_path_buf(),
            detail: e.to_string(),
        };

        match version {
            1 => {
                tracing::debug!(from = 1, to = SCHEMA_VERSION, "migrating record");
                let v1: RecordV1 = serde_json::from_value(value).map_err(corrupt)?;
                Ok(v2_to_v3(v1_to_v2(v1), Utc::now()))
            }
            2 => {
                tracing::debug!(from = 2, to = SCHEMA_VERSION, "migrating record");
                let v2: RecordV2 = serde_json::from_value(value).map_err(corrupt)?;
                Ok(v2_to_v3(v2, Utc::now()))
            }
            3 => Ok(serde_json::from_value(value).map_err(corrupt)?),
            other => Err(AttestError::SchemaCorrupt {
                path: path.to_path_buf(),
                detail: format!("unknown schema version {other}"),
            }
            .into()),
        }
    }

    /// Persist the full record atomically. Bumps the revision counter and
    /// warns when the on-disk record changed since this store loaded it.
    pub fn save(&mut self, record: &mut Record) -> Result<()> {
        let path = self.record_path();
        fs::create_dir_all(&self.dir).map_err(|e| AttestError::StoreWrite {
            path: self.dir.clone(),
            source: e,
        })?;

        // Advisory lock held across the peek-and-replace; cooperative only.
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())
            .map_err(|e| AttestError::StoreWrite {
                path: self.lock_path(),
                source: e,
            })?;
        lock_file
            .lock_exclusive()
            .map_err(|e| AttestError::StoreWrite {
                path: self.lock_path(),
                source: e,
            })?;

        let disk_revision = self.peek_revision();
        if let (Some(loaded), Some(found)) = (self.loaded_revision, disk_revision) {
            if found != loaded {
                let conflict = AttestError::StoreWriteConflict { loaded, found };
                tracing::warn!("{conflict}");
            }
        }

        record.revision = disk_revision
            .unwrap_or(0)
            .max(self.loaded_revision.unwrap_or(0))
            + 1;
        record.updated_at = Utc::now();
        record.schema_version = SCHEMA_VERSION;

        let json = serde_json::to_string_pretty(record).context("Failed to serialize record")?;

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| AttestError::StoreWrite {
            path: path.clone(),
            source: e,
        })?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| AttestError::StoreWrite {
                path: path.clone(),
                source: e,
            })?;
        tmp.persist(&path).map_err(|e| AttestError::StoreWrite {
            path: path.clone(),
            source: e.error,
        })?;

        self.loaded_revision = Some(record.revision);
        tracing::debug!(revision = record.revision, "record saved");
        Ok(())
    }

    /// Revision currently on disk, if a parseable record is present.
    fn peek_revision(&self) -> Option<u64> {
        let content = fs::read_to_string(self.record_path()).ok()?;
        let value: serde_json::Value = serde_json::from_str(&content).ok()?;
        value.get("revision").and_then(|v| v.as_u64())
    }
}
