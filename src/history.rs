//! Append-only change history for guide documents
use crate::guide::{GuideDocument, GuideStatus, TimeStamp};
use crate::transition::GuideAction;
use chrono::Utc;

/// One immutable snapshot in a guide's history. Records for a guide form a
/// strictly increasing, gap-free version sequence starting at 1; they are
/// never rewritten and are only removed when the parent document is
/// deleted.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct GuideHistoryRecord {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub guide_id: String,
    #[n(2)]
    pub tenant_id: String, // denormalized for scan scoping
    #[n(3)]
    pub version: u64,
    #[n(4)]
    pub content: String, // full snapshot, not a diff
    #[n(5)]
    pub content_hash: String, // sha256 hex digest of `content`
    #[n(6)]
    pub status: GuideStatus,
    #[n(7)]
    pub change: GuideAction,
    #[n(8)]
    pub changed_by: String,
    #[n(9)]
    pub changed_at: TimeStamp<Utc>,
}

impl GuideHistoryRecord {
    /// Snapshot `doc` as the history record for the transition that just
    /// produced it.
    pub fn snapshot(id: String, doc: &GuideDocument, change: GuideAction, changed_by: &str) -> Self {
        Self {
            id,
            guide_id: doc.id.clone(),
            tenant_id: doc.tenant_id.clone(),
            version: doc.version,
            content: doc.content.clone(),
            content_hash: sha256::digest(&doc.content),
            status: doc.status,
            change,
            changed_by: changed_by.to_string(),
            changed_at: TimeStamp::new(),
        }
    }

    /// Re-hash the stored content and compare against the recorded digest.
    pub fn verify_content(&self) -> bool {
        sha256::digest(&self.content) == self.content_hash
    }
}
