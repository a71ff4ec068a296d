//! Forward schema migrations
//!
//! Each step is a pure function from one schema version to the next and is
//! lossless for every field the target schema retains. The store selects
//! the chain by the record's explicit `schema_version` field.

use chrono::{DateTime, Utc};

use crate::models::feature::slug_id;
use crate::models::{
    ChecklistItem, Feature, MachineCheck, VerificationStatus, CHECKLIST_ACTOR,
};
use crate::store::schema::{
    ChecklistItemV2, FeatureV2, Record, RecordV1, RecordV2, SCHEMA_VERSION,
};

/// v1 → v2: checklist items become structured objects. Item text carries
/// over verbatim; completion defaults to false with no completed_by or
/// completed_at synthesized.
pub fn v1_to_v2(record: RecordV1) -> RecordV2 {
    RecordV2 {
        schema_version: 2,
        features: record
            .features
            .into_iter()
            .map(|f| FeatureV2 {
                id: f.id,
                category: f.category,
                description: f.description,
                checks: f.checks,
                checklist: f
                    .checklist
                    .into_iter()
                    .map(|text| ChecklistItemV2 {
                        id: Some(slug_id(&text)),
                        text,
                        completed: false,
                        completed_by: None,
                        completed_at: None,
                    })
                    .collect(),
                verified_by: f.verified_by,
                verified_at: f.verified_at,
            })
            .collect(),
    }
}

/// v2 → v3: per-depth machine state maps, history, and the retired flag are
/// introduced empty; the legacy who/when verification pair becomes the
/// structured status. `migrated_at` stamps timestamps the old schema never
/// recorded so the step stays a pure function.
pub fn v2_to_v3(record: RecordV2, migrated_at: DateTime<Utc>) -> Record {
    let features = record
        .features
        .into_iter()
        .map(|f| {
            let checklist: Vec<ChecklistItem> = f
                .checklist
                .into_iter()
                .map(|item| ChecklistItem {
                    id: item.id.unwrap_or_else(|| slug_id(&item.text)),
                    text: item.text,
                    completed: item.completed,
                    completed_by: if item.completed { item.completed_by } else { None },
                    completed_at: if item.completed { item.completed_at } else { None },
                })
                .collect();

            let status = derive_legacy_status(
                f.verified_by.as_deref(),
                f.verified_at,
                &checklist,
                migrated_at,
            );

            Feature {
                id: f.id,
                category: f.category,
                description: f.description,
                checks: f
                    .checks
                    .into_iter()
                    .map(|c| MachineCheck::new(&c.id, &c.command, c.min_depth))
                    .collect(),
                checklist,
                status,
                retired: false,
                history: Vec::new(),
                created_at: migrated_at,
                updated_at: migrated_at,
            }
        })
        .collect();

    Record {
        schema_version: SCHEMA_VERSION,
        revision: 0,
        updated_at: migrated_at,
        features,
    }
}

/// Map the v1/v2 verification metadata onto the v3 tagged status.
fn derive_legacy_status(
    verified_by: Option<&str>,
    verified_at: Option<DateTime<Utc>>,
    checklist: &[ChecklistItem],
    migrated_at: DateTime<Utc>,
) -> VerificationStatus {
    if let Some(by) = verified_by {
        let at = verified_at.unwrap_or(migrated_at);
        if by == CHECKLIST_ACTOR {
            return VerificationStatus::ChecklistVerified {
                verified_by: CHECKLIST_ACTOR.to_string(),
                at,
            };
        }
        return VerificationStatus::HumanVerified {
            verified_by: by.to_string(),
            at,
        };
    }

    let total = checklist.len();
    let complete = checklist.iter().filter(|i| i.completed).count();
    if total > 0 && complete == total {
        VerificationStatus::ChecklistVerified {
            verified_by: CHECKLIST_ACTOR.to_string(),
            at: migrated_at,
        }
    } else if complete > 0 {
        VerificationStatus::PartiallyChecklisted { complete, total }
    } else {
        VerificationStatus::Untested
    }
}
