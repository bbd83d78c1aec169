//! Smoke screen unit tests for living-guide components
//!
//! These are unit tests that span the codebase, testing behavior in
//! isolation from integration scenarios. They are intended as smoke-screen
//! and generally test the happy-path.

use living_guide::{
    error::{GuideError, ValidationError},
    guide::{self, GuideStatus, TITLE_MAX_CHARS},
    transition::{ApprovalEffect, ApprovalStateMachine, GuideAction},
    utils::new_uuid_to_bech32,
};

// UTILS MODULE TESTS
mod utils_tests {
    use super::*;

    /// Test that new_uuid_to_bech32 generates valid bech32-encoded strings
    /// with the correct human-readable prefix
    #[test]
    fn generates_valid_bech32_with_hrp() {
        let result = new_uuid_to_bech32("guide_");
        assert!(result.is_ok());

        let encoded = result.unwrap();
        assert!(encoded.starts_with("guide_1"));
        assert!(encoded.len() > 10); // UUID should produce substantial output
    }

    /// Test that the function handles empty strings appropriately
    #[test]
    fn handles_empty_hrp() {
        // Empty string should fail
        let result = new_uuid_to_bech32("");
        assert!(result.is_err());
    }

    /// Test that multiple calls generate unique identifiers
    #[test]
    fn generates_unique_ids() {
        let id1 = new_uuid_to_bech32("guide_").unwrap();
        let id2 = new_uuid_to_bech32("guide_").unwrap();
        let id3 = new_uuid_to_bech32("guide_").unwrap();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    /// Test that different HRPs produce different encoded strings
    #[test]
    fn different_hrps_produce_different_encodings() {
        let guide_id = new_uuid_to_bech32("guide_").unwrap();
        let tenant_id = new_uuid_to_bech32("tenant_").unwrap();

        assert!(guide_id.starts_with("guide_"));
        assert!(tenant_id.starts_with("tenant_"));
        assert_ne!(guide_id, tenant_id);
    }
}

// GUIDE MODULE TESTS
mod guide_tests {
    use super::*;

    /// Test that a reasonable title passes validation
    #[test]
    fn validate_title_accepts_normal_title() {
        assert!(guide::validate_title("Recycling guide").is_ok());
    }

    /// Test that empty and whitespace-only titles are rejected
    #[test]
    fn validate_title_rejects_empty() {
        assert!(matches!(
            guide::validate_title(""),
            Err(ValidationError::EmptyTitle)
        ));
        assert!(matches!(
            guide::validate_title("   "),
            Err(ValidationError::EmptyTitle)
        ));
    }

    /// Test the title length boundary
    #[test]
    fn validate_title_enforces_limit() {
        let at_limit = "a".repeat(TITLE_MAX_CHARS);
        assert!(guide::validate_title(&at_limit).is_ok());

        let over_limit = "a".repeat(TITLE_MAX_CHARS + 1);
        assert!(matches!(
            guide::validate_title(&over_limit),
            Err(ValidationError::TitleTooLong { .. })
        ));
    }

    /// Test that empty content is rejected
    #[test]
    fn validate_content_rejects_empty() {
        assert!(matches!(
            guide::validate_content(""),
            Err(ValidationError::EmptyContent)
        ));
        assert!(guide::validate_content("actual rules").is_ok());
    }
}

// TRANSITION MODULE TESTS
mod transition_tests {
    use super::*;

    fn machine() -> ApprovalStateMachine {
        ApprovalStateMachine::new()
    }

    /// Test that editing a draft keeps it in draft
    #[test]
    fn draft_update_stays_draft() {
        let plan = machine()
            .plan(GuideStatus::Draft, GuideAction::Update)
            .unwrap();

        assert_eq!(plan.status, GuideStatus::Draft);
        assert_eq!(plan.approval, ApprovalEffect::Keep);
        assert!(plan.wants_content);
    }

    /// Test that submitting a draft moves it to pending approval
    #[test]
    fn draft_submit_goes_pending() {
        let plan = machine()
            .plan(GuideStatus::Draft, GuideAction::Submit)
            .unwrap();

        assert_eq!(plan.status, GuideStatus::PendingApproval);
        assert!(!plan.wants_content);
    }

    /// Test that approving sets the approval fields
    #[test]
    fn pending_approve_sets_approval() {
        let plan = machine()
            .plan(GuideStatus::PendingApproval, GuideAction::Approve)
            .unwrap();

        assert_eq!(plan.status, GuideStatus::Approved);
        assert_eq!(plan.approval, ApprovalEffect::Set);
    }

    /// Test that rejecting clears the approval fields
    #[test]
    fn pending_reject_clears_approval() {
        let plan = machine()
            .plan(GuideStatus::PendingApproval, GuideAction::Reject)
            .unwrap();

        assert_eq!(plan.status, GuideStatus::Rejected);
        assert_eq!(plan.approval, ApprovalEffect::Clear);
    }

    /// Test that a rejected guide can be reworked into a draft
    #[test]
    fn rejected_update_reopens_draft() {
        let plan = machine()
            .plan(GuideStatus::Rejected, GuideAction::Update)
            .unwrap();

        assert_eq!(plan.status, GuideStatus::Draft);
        assert_eq!(plan.approval, ApprovalEffect::Clear);
    }

    /// Test that a rejected guide can be resubmitted without an edit
    #[test]
    fn rejected_submit_goes_pending() {
        let plan = machine()
            .plan(GuideStatus::Rejected, GuideAction::Submit)
            .unwrap();

        assert_eq!(plan.status, GuideStatus::PendingApproval);
        assert_eq!(plan.approval, ApprovalEffect::Clear);
    }

    /// Test that editing an approved guide invalidates the approval
    #[test]
    fn approved_update_invalidates_approval() {
        let plan = machine()
            .plan(GuideStatus::Approved, GuideAction::Update)
            .unwrap();

        assert_eq!(plan.status, GuideStatus::Draft);
        assert_eq!(plan.approval, ApprovalEffect::Clear);
    }

    /// Test that rollback is legal from every status and always lands in
    /// draft with the approval cleared
    #[test]
    fn rollback_always_forces_draft() {
        for status in [
            GuideStatus::Draft,
            GuideStatus::PendingApproval,
            GuideStatus::Approved,
            GuideStatus::Rejected,
        ] {
            let plan = machine().plan(status, GuideAction::Rollback).unwrap();

            assert_eq!(plan.status, GuideStatus::Draft);
            assert_eq!(plan.approval, ApprovalEffect::Clear);
            assert!(plan.wants_content);
        }
    }

    /// Test that pairs outside the table fail with IllegalTransition and
    /// identify what was attempted
    #[test]
    fn pairs_outside_the_table_are_illegal() {
        let illegal = [
            (GuideStatus::Draft, GuideAction::Approve),
            (GuideStatus::Draft, GuideAction::Reject),
            (GuideStatus::PendingApproval, GuideAction::Update),
            (GuideStatus::PendingApproval, GuideAction::Submit),
            (GuideStatus::Approved, GuideAction::Submit),
            (GuideStatus::Approved, GuideAction::Approve),
            (GuideStatus::Approved, GuideAction::Reject),
            (GuideStatus::Rejected, GuideAction::Approve),
            (GuideStatus::Rejected, GuideAction::Reject),
        ];

        for (status, action) in illegal {
            match machine().plan(status, action) {
                Err(GuideError::IllegalTransition { current, action: a }) => {
                    assert_eq!(current, status);
                    assert_eq!(a, action);
                }
                other => panic!("expected IllegalTransition for ({status}, {action}), got {other:?}"),
            }
        }
    }
}
