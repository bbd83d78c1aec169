//! Service layer API for living-guide workflow operations
//!
//! This is the single entry point the surrounding API layer consumes; no
//! other path writes guide documents or history records, so every mutation
//! is guaranteed to pass through the approval state machine.
use crate::error::GuideError;
use crate::guide::GuideDocument;
use crate::history::GuideHistoryRecord;
use crate::rollback::RollbackEngine;
use crate::store::{GuideFilter, VersionedDocumentStore};
use crate::transition::{ApprovalStateMachine, GuideAction};
use std::sync::Arc;
use tracing::{debug, info};

pub struct LivingGuideService {
    store: VersionedDocumentStore,
    // in future we could add a config for approval constraints
}

impl LivingGuideService {
    pub fn new(store: VersionedDocumentStore) -> Self {
        Self { store }
    }

    /// Convenience constructor wiring the default state machine over `db`.
    pub fn open(db: Arc<sled::Db>) -> Self {
        Self::new(VersionedDocumentStore::new(db, ApprovalStateMachine::new()))
    }

    /// Create a new guide draft for a tenant.
    pub fn create(
        &self,
        tenant_id: &str,
        title: &str,
        content: &str,
        actor_id: &str,
    ) -> Result<GuideDocument, GuideError> {
        let doc = self.store.create_guide(tenant_id, title, content, actor_id)?;
        info!(tenant_id, guide_id = %doc.id, "created living guide");

        Ok(doc)
    }

    /// Replace the guide content, opening a new draft cycle if the guide
    /// was previously approved or rejected.
    pub fn update(
        &self,
        tenant_id: &str,
        id: &str,
        content: &str,
        actor_id: &str,
    ) -> Result<GuideDocument, GuideError> {
        self.transition(tenant_id, id, GuideAction::Update, Some(content), actor_id)
    }

    /// Submit a draft (or rejected) guide for approval.
    pub fn submit(
        &self,
        tenant_id: &str,
        id: &str,
        actor_id: &str,
    ) -> Result<GuideDocument, GuideError> {
        self.transition(tenant_id, id, GuideAction::Submit, None, actor_id)
    }

    /// Approve a guide that is pending approval. Whether `actor_id` is
    /// allowed to approve is the caller's responsibility.
    pub fn approve(
        &self,
        tenant_id: &str,
        id: &str,
        actor_id: &str,
    ) -> Result<GuideDocument, GuideError> {
        self.transition(tenant_id, id, GuideAction::Approve, None, actor_id)
    }

    /// Reject a guide that is pending approval.
    pub fn reject(
        &self,
        tenant_id: &str,
        id: &str,
        actor_id: &str,
    ) -> Result<GuideDocument, GuideError> {
        self.transition(tenant_id, id, GuideAction::Reject, None, actor_id)
    }

    /// All guides for a tenant matching `filter`, most recently updated
    /// first.
    pub fn list_for_tenant(
        &self,
        tenant_id: &str,
        filter: &GuideFilter,
    ) -> Result<Vec<GuideDocument>, GuideError> {
        self.store.list_guides(tenant_id, filter)
    }

    /// The current document together with its full history, ascending by
    /// version.
    pub fn get_detail_with_history(
        &self,
        tenant_id: &str,
        id: &str,
    ) -> Result<(GuideDocument, Vec<GuideHistoryRecord>), GuideError> {
        let doc = self.store.get_guide(tenant_id, id)?;
        let history = self.store.get_history(tenant_id, id)?;

        Ok((doc, history))
    }

    /// Restore the content recorded at `target_version` as a new draft
    /// version.
    pub fn rollback_to(
        &self,
        tenant_id: &str,
        id: &str,
        target_version: u64,
        actor_id: &str,
    ) -> Result<GuideDocument, GuideError> {
        let engine = RollbackEngine::new(&self.store);

        let doc = match engine.rollback(tenant_id, id, target_version, actor_id) {
            Err(GuideError::ConcurrentModification { .. }) => {
                debug!(tenant_id, guide_id = id, "rollback raced, retrying once");
                engine.rollback(tenant_id, id, target_version, actor_id)?
            }
            other => other?,
        };
        info!(
            tenant_id,
            guide_id = id,
            target_version,
            version = doc.version,
            "guide rolled back"
        );

        Ok(doc)
    }

    /// Delete a guide and, by cascade, all of its history.
    pub fn delete(&self, tenant_id: &str, id: &str) -> Result<(), GuideError> {
        self.store.delete_guide(tenant_id, id)?;
        info!(tenant_id, guide_id = id, "deleted living guide");

        Ok(())
    }

    // Read-then-commit with a single retry when another writer slipped in
    // between our read and our commit. Anything else surfaces verbatim.
    fn transition(
        &self,
        tenant_id: &str,
        id: &str,
        action: GuideAction,
        content: Option<&str>,
        actor_id: &str,
    ) -> Result<GuideDocument, GuideError> {
        match self.try_transition(tenant_id, id, action, content, actor_id) {
            Err(GuideError::ConcurrentModification { .. }) => {
                debug!(tenant_id, guide_id = id, %action, "commit raced, retrying once against fresh state");
                self.try_transition(tenant_id, id, action, content, actor_id)
            }
            other => other,
        }
    }

    fn try_transition(
        &self,
        tenant_id: &str,
        id: &str,
        action: GuideAction,
        content: Option<&str>,
        actor_id: &str,
    ) -> Result<GuideDocument, GuideError> {
        let current = self.store.get_guide(tenant_id, id)?;
        let doc =
            self.store
                .commit_transition(tenant_id, id, action, content, actor_id, current.version)?;
        info!(
            tenant_id,
            guide_id = id,
            %action,
            version = doc.version,
            status = %doc.status,
            "guide transition committed"
        );

        Ok(doc)
    }
}
