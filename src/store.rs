//! Tenant-scoped persistence for guide documents and their history log
//!
//! Documents and history records live in the sled default tree under
//! distinct key prefixes. A transition writes the updated document and its
//! new history record through one `sled::Batch`, so readers never observe
//! one without the other.
//!
//! Key layout:
//! - `guide/{tenant_id}/{guide_id}` → CBOR [`GuideDocument`]
//! - `hist/{tenant_id}/{guide_id}/{version:be64}` → CBOR [`GuideHistoryRecord`]
//!
//! The big-endian version suffix keeps a prefix scan over a guide's
//! history in ascending version order.

use crate::error::{GuideError, ValidationError};
use crate::guide::{self, GuideDocument, GuideStatus, TimeStamp};
use crate::history::GuideHistoryRecord;
use crate::transition::{ApprovalEffect, ApprovalStateMachine, GuideAction};
use crate::utils;
use sled::Batch;
use std::sync::{Arc, Mutex};

const GUIDE_PREFIX: &str = "guide";
const HIST_PREFIX: &str = "hist";

/// Listing filter: both fields are optional and combine with AND. `q` is a
/// case-insensitive substring match on the title.
#[derive(Debug, Default, Clone)]
pub struct GuideFilter {
    pub status: Option<GuideStatus>,
    pub q: Option<String>,
}

pub struct VersionedDocumentStore {
    instance: Arc<sled::Db>,
    machine: ApprovalStateMachine,
    // Serializes the read-validate-commit sequence so the expected-version
    // check and the batch apply act as one compare-and-swap per guide.
    commit_lock: Mutex<()>,
}

// Ids become key segments, so one carrying the separator would collide
// with another tenant's key space and punch through the scan scoping.
// Generated ids are bech32 and can never contain '/'; caller-supplied ones
// are rejected at the boundary.
fn validate_key_segment(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() || id.contains('/') {
        return Err(ValidationError::InvalidId(id.to_string()));
    }
    Ok(())
}

fn guide_key(tenant_id: &str, id: &str) -> Vec<u8> {
    format!("{GUIDE_PREFIX}/{tenant_id}/{id}").into_bytes()
}

fn guide_scan_prefix(tenant_id: &str) -> Vec<u8> {
    format!("{GUIDE_PREFIX}/{tenant_id}/").into_bytes()
}

fn history_key(tenant_id: &str, guide_id: &str, version: u64) -> Vec<u8> {
    let mut key = history_scan_prefix(tenant_id, guide_id);
    key.extend_from_slice(&version.to_be_bytes());
    key
}

fn history_scan_prefix(tenant_id: &str, guide_id: &str) -> Vec<u8> {
    format!("{HIST_PREFIX}/{tenant_id}/{guide_id}/").into_bytes()
}

impl VersionedDocumentStore {
    pub fn new(instance: Arc<sled::Db>, machine: ApprovalStateMachine) -> Self {
        Self {
            instance,
            machine,
            commit_lock: Mutex::new(()),
        }
    }

    /// Create a new guide at version 1 in `Draft` status, together with its
    /// `create` history record.
    pub fn create_guide(
        &self,
        tenant_id: &str,
        title: &str,
        content: &str,
        created_by: &str,
    ) -> Result<GuideDocument, GuideError> {
        validate_key_segment(tenant_id)?;
        guide::validate_title(title)?;
        guide::validate_content(content)?;

        let id = utils::new_uuid_to_bech32(utils::GUIDE_HRP).map_err(GuideError::Id)?;
        let now = TimeStamp::new();
        let doc = GuideDocument {
            id,
            tenant_id: tenant_id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            status: GuideStatus::Draft,
            version: 1,
            created_by: created_by.to_string(),
            approved_by: None,
            approved_at: None,
            created_at: now.clone(),
            updated_at: now,
        };

        let record = self.new_record(&doc, GuideAction::Create, created_by)?;
        self.apply(&doc, &record)?;

        Ok(doc)
    }

    /// Current document for `(tenant_id, id)`.
    pub fn get_guide(&self, tenant_id: &str, id: &str) -> Result<GuideDocument, GuideError> {
        validate_key_segment(tenant_id)?;
        validate_key_segment(id)?;

        let Some(raw) = self.instance.get(guide_key(tenant_id, id))? else {
            return Err(GuideError::NotFound {
                kind: "guide",
                id: id.to_string(),
            });
        };

        Ok(minicbor::decode(raw.as_ref())?)
    }

    /// All guides for a tenant matching `filter`, most recently updated
    /// first. Each call re-queries current state.
    pub fn list_guides(
        &self,
        tenant_id: &str,
        filter: &GuideFilter,
    ) -> Result<Vec<GuideDocument>, GuideError> {
        validate_key_segment(tenant_id)?;

        let needle = filter.q.as_ref().map(|q| q.to_lowercase());

        let mut guides = Vec::new();
        for entry in self.instance.scan_prefix(guide_scan_prefix(tenant_id)) {
            let (_, raw) = entry?;
            let doc: GuideDocument = minicbor::decode(raw.as_ref())?;

            if let Some(status) = filter.status {
                if doc.status != status {
                    continue;
                }
            }
            if let Some(needle) = &needle {
                if !doc.title.to_lowercase().contains(needle) {
                    continue;
                }
            }

            guides.push(doc);
        }

        guides.sort_by(|a, b| {
            b.updated_at
                .to_datetime_utc()
                .cmp(&a.updated_at.to_datetime_utc())
        });

        Ok(guides)
    }

    /// Apply `action` to the guide, checking legality with the state
    /// machine and bumping the version by exactly one.
    ///
    /// `expected_version` is the version the caller read before requesting
    /// the transition; if the stored document has moved on since, the
    /// commit fails with `ConcurrentModification` and nothing is written.
    pub fn commit_transition(
        &self,
        tenant_id: &str,
        id: &str,
        action: GuideAction,
        new_content: Option<&str>,
        actor_id: &str,
        expected_version: u64,
    ) -> Result<GuideDocument, GuideError> {
        let _guard = self.commit_lock.lock().expect("commit lock poisoned");

        let current = self.get_guide(tenant_id, id)?;
        if current.version != expected_version {
            return Err(GuideError::ConcurrentModification {
                expected: expected_version,
                actual: current.version,
            });
        }

        let plan = self.machine.plan(current.status, action)?;

        let content = if plan.wants_content {
            let Some(content) = new_content else {
                return Err(ValidationError::EmptyContent.into());
            };
            guide::validate_content(content)?;
            content.to_string()
        } else {
            current.content.clone()
        };

        let now = TimeStamp::new();
        let (approved_by, approved_at) = match plan.approval {
            ApprovalEffect::Keep => (current.approved_by.clone(), current.approved_at.clone()),
            ApprovalEffect::Set => (Some(actor_id.to_string()), Some(now.clone())),
            ApprovalEffect::Clear => (None, None),
        };

        let doc = GuideDocument {
            content,
            status: plan.status,
            version: current.version + 1,
            approved_by,
            approved_at,
            updated_at: now,
            ..current
        };

        let record = self.new_record(&doc, action, actor_id)?;
        self.apply(&doc, &record)?;

        Ok(doc)
    }

    /// Full history for a guide, ascending by version.
    pub fn get_history(
        &self,
        tenant_id: &str,
        guide_id: &str,
    ) -> Result<Vec<GuideHistoryRecord>, GuideError> {
        validate_key_segment(tenant_id)?;
        validate_key_segment(guide_id)?;

        let mut records = Vec::new();
        for entry in self
            .instance
            .scan_prefix(history_scan_prefix(tenant_id, guide_id))
        {
            let (_, raw) = entry?;
            records.push(minicbor::decode(raw.as_ref())?);
        }

        Ok(records)
    }

    /// The snapshot recorded at `version`, if that version ever existed.
    pub fn get_history_at(
        &self,
        tenant_id: &str,
        guide_id: &str,
        version: u64,
    ) -> Result<GuideHistoryRecord, GuideError> {
        validate_key_segment(tenant_id)?;
        validate_key_segment(guide_id)?;

        let Some(raw) = self.instance.get(history_key(tenant_id, guide_id, version))? else {
            return Err(GuideError::NotFound {
                kind: "guide version",
                id: format!("{guide_id}@v{version}"),
            });
        };

        Ok(minicbor::decode(raw.as_ref())?)
    }

    /// Remove the document and every one of its history records in one
    /// batch (cascade).
    pub fn delete_guide(&self, tenant_id: &str, id: &str) -> Result<(), GuideError> {
        let _guard = self.commit_lock.lock().expect("commit lock poisoned");

        // surfaces NotFound for unknown guides before anything is removed
        self.get_guide(tenant_id, id)?;

        let mut batch = Batch::default();
        batch.remove(guide_key(tenant_id, id));
        for entry in self.instance.scan_prefix(history_scan_prefix(tenant_id, id)) {
            let (key, _) = entry?;
            batch.remove(key);
        }
        self.instance.apply_batch(batch)?;

        Ok(())
    }

    fn new_record(
        &self,
        doc: &GuideDocument,
        action: GuideAction,
        actor_id: &str,
    ) -> Result<GuideHistoryRecord, GuideError> {
        let id = utils::new_uuid_to_bech32(utils::HISTORY_HRP).map_err(GuideError::Id)?;
        Ok(GuideHistoryRecord::snapshot(id, doc, action, actor_id))
    }

    // Batch insert: the updated document and its appended history record
    // land together or not at all.
    fn apply(&self, doc: &GuideDocument, record: &GuideHistoryRecord) -> Result<(), GuideError> {
        let mut batch = Batch::default();
        batch.insert(guide_key(&doc.tenant_id, &doc.id), minicbor::to_vec(doc)?);
        batch.insert(
            history_key(&doc.tenant_id, &doc.id, record.version),
            minicbor::to_vec(record)?,
        );
        self.instance.apply_batch(batch)?;

        Ok(())
    }
}
