//! Living-guide approval and versioning engine.
//!
//! A living guide is a tenant-scoped document that moves through a
//! draft / pending-approval / approved / rejected lifecycle. Every
//! transition bumps the version by exactly one and appends a full
//! content snapshot to an append-only history log, so any prior
//! version can be restored by replaying it forward as a new draft.
//!
//! The pieces compose bottom-up: [`transition::ApprovalStateMachine`]
//! decides which transitions are legal, [`store::VersionedDocumentStore`]
//! persists documents and history atomically over sled,
//! [`rollback::RollbackEngine`] restores prior snapshots, and
//! [`service::LivingGuideService`] is the single entry point the
//! surrounding API layer talks to.

pub mod error;
pub mod guide;
pub mod history;
pub mod rollback;
pub mod service;
pub mod store;
pub mod transition;
pub mod utils;
