//! Shared fixtures for integration tests

use chrono::Utc;
use std::path::Path;
use tempfile::TempDir;

use attest::inventory::{load_inventory, sync};
use attest::store::{Record, Store};

pub const INVENTORY: &str = r#"
features:
  - id: backup
    category: setup
    description: Backups restore cleanly
    checklist:
      - Restore completes
      - Data intact after restore
      - Permissions preserved
  - id: gateway
    category: network
    description: Gateway reachable
    checks:
      - id: reachable
        command: "true"
        min_depth: standard
  - id: tls
    category: network
    description: TLS terminates correctly
    checks:
      - id: handshake
        command: "exit 1"
        min_depth: basic
"#;

/// Create a store directory with the fixture inventory synced in.
pub fn seeded_store() -> TempDir {
    let temp = TempDir::new().expect("Should create temp dir");
    let inventory_path = temp.path().join("inventory.yaml");
    std::fs::write(&inventory_path, INVENTORY).expect("Should write inventory");

    let inventory = load_inventory(&inventory_path).expect("Should parse inventory");
    let mut store = store_at(temp.path());
    let mut record = store.load_or_init().expect("Should init record");
    sync(&mut record, &inventory, Utc::now());
    store.save(&mut record).expect("Should save record");
    temp
}

pub fn store_at(dir: &Path) -> Store {
    Store::new(dir.join(".attest"))
}

pub fn load(dir: &Path) -> Record {
    store_at(dir).load().expect("Should load record")
}
