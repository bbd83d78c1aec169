//! Rollback by forward replay of a historical snapshot
use crate::error::GuideError;
use crate::guide::GuideDocument;
use crate::store::VersionedDocumentStore;
use crate::transition::GuideAction;

/// Restores a guide's live content to a previously recorded version.
///
/// Rollback never truncates or rewrites history. It replays the target
/// snapshot forward as a brand-new version (`current_max + 1`) in `Draft`
/// status, so the audit trail stays complete no matter how many rollbacks
/// occur and a restored guide always goes back through approval.
pub struct RollbackEngine<'a> {
    store: &'a VersionedDocumentStore,
}

impl<'a> RollbackEngine<'a> {
    pub fn new(store: &'a VersionedDocumentStore) -> Self {
        Self { store }
    }

    pub fn rollback(
        &self,
        tenant_id: &str,
        guide_id: &str,
        target_version: u64,
        actor_id: &str,
    ) -> Result<GuideDocument, GuideError> {
        let current = self.store.get_guide(tenant_id, guide_id)?;

        // NotFound if the target version was never recorded
        let snapshot = self
            .store
            .get_history_at(tenant_id, guide_id, target_version)?;

        // rolling back to the version the guide is already at is a no-op
        // and gets rejected rather than minting a duplicate version
        if target_version == current.version {
            return Err(GuideError::InvalidRollbackTarget {
                requested: target_version,
                current: current.version,
            });
        }

        self.store.commit_transition(
            tenant_id,
            guide_id,
            GuideAction::Rollback,
            Some(&snapshot.content),
            actor_id,
            current.version,
        )
    }
}
