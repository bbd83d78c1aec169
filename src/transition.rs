//! Approval state machine for guide documents
//!
//! The machine is pure: it looks at the current status and the requested
//! action and answers with a [`TransitionPlan`] or an
//! [`GuideError::IllegalTransition`]. It performs no I/O and no role
//! checks; who is allowed to approve or reject is the calling layer's
//! problem.
use crate::error::GuideError;
use crate::guide::GuideStatus;
use std::fmt;

/// An action requested against a guide. `Create` never passes through the
/// state machine; it only appears as the change type of the first history
/// record.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideAction {
    #[n(0)]
    Create,
    #[n(1)]
    Update,
    #[n(2)]
    Submit,
    #[n(3)]
    Approve,
    #[n(4)]
    Reject,
    #[n(5)]
    Rollback,
}

impl fmt::Display for GuideAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GuideAction::Create => "create",
            GuideAction::Update => "update",
            GuideAction::Submit => "submit",
            GuideAction::Approve => "approve",
            GuideAction::Reject => "reject",
            GuideAction::Rollback => "rollback",
        };
        f.write_str(s)
    }
}

/// What happens to the `approved_by` / `approved_at` pair on a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalEffect {
    Keep,
    Set,
    Clear,
}

/// The computed outcome of a legal transition. The version increment is
/// not part of the plan because it is always exactly +1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    pub status: GuideStatus,
    pub approval: ApprovalEffect,
    /// Whether the action replaces the document content (`Update`,
    /// `Rollback`) or carries it forward unchanged.
    pub wants_content: bool,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ApprovalStateMachine;

impl ApprovalStateMachine {
    pub fn new() -> Self {
        Self
    }

    /// Decide whether `action` is legal from `current` and what it
    /// produces. Every legal transition also increments the document
    /// version by exactly one; that rule lives with the committing store.
    pub fn plan(
        &self,
        current: GuideStatus,
        action: GuideAction,
    ) -> Result<TransitionPlan, GuideError> {
        use ApprovalEffect::{Clear, Keep, Set};
        use GuideAction::{Approve, Reject, Rollback, Submit, Update};
        use GuideStatus::{Approved, Draft, PendingApproval, Rejected};

        let plan = match (current, action) {
            (Draft, Update) => TransitionPlan {
                status: Draft,
                approval: Keep,
                wants_content: true,
            },
            (Draft, Submit) => TransitionPlan {
                status: PendingApproval,
                approval: Keep,
                wants_content: false,
            },
            (PendingApproval, Approve) => TransitionPlan {
                status: Approved,
                approval: Set,
                wants_content: false,
            },
            (PendingApproval, Reject) => TransitionPlan {
                status: Rejected,
                approval: Clear,
                wants_content: false,
            },
            // a rejected guide may be reworked or resubmitted as-is
            (Rejected, Update) => TransitionPlan {
                status: Draft,
                approval: Clear,
                wants_content: true,
            },
            (Rejected, Submit) => TransitionPlan {
                status: PendingApproval,
                approval: Clear,
                wants_content: false,
            },
            // editing an approved guide opens a new draft cycle; the
            // approved snapshot stays in history
            (Approved, Update) => TransitionPlan {
                status: Draft,
                approval: Clear,
                wants_content: true,
            },
            // rollback is legal from any status and always lands in draft,
            // so a restored guide must be re-approved
            (_, Rollback) => TransitionPlan {
                status: Draft,
                approval: Clear,
                wants_content: true,
            },
            (current, action) => {
                return Err(GuideError::IllegalTransition { current, action });
            }
        };

        Ok(plan)
    }
}
