//! Property-based tests for the journal lifecycle.

use koperasi_shared::types::UserId;
use proptest::prelude::*;
use uuid::Uuid;

use crate::journal::error::JournalError;
use crate::journal::types::JournalStatus;
use crate::journal::workflow::{JournalAction, JournalWorkflow};

#[derive(Debug, Clone, Copy)]
enum Op {
    Post,
    Cancel,
}

fn arb_status() -> impl Strategy<Value = JournalStatus> {
    prop_oneof![
        Just(JournalStatus::Draft),
        Just(JournalStatus::Posted),
        Just(JournalStatus::Cancelled),
    ]
}

fn arb_user() -> impl Strategy<Value = UserId> {
    any::<u128>().prop_map(|n| UserId::from(Uuid::from_u128(n)))
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(prop_oneof![Just(Op::Post), Just(Op::Cancel)], 0..10)
}

fn apply(status: JournalStatus, op: Op, user: UserId) -> Result<JournalAction, JournalError> {
    match op {
        Op::Post => JournalWorkflow::post(status, user),
        Op::Cancel => JournalWorkflow::cancel(status, user, None),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every accepted transition is in the transition table and every refused
    /// one is not.
    #[test]
    fn prop_workflow_agrees_with_table(status in arb_status(), user in arb_user()) {
        let post = JournalWorkflow::post(status, user);
        prop_assert_eq!(
            post.is_ok(),
            JournalWorkflow::is_valid_transition(status, JournalStatus::Posted)
        );
        let cancel = JournalWorkflow::cancel(status, user, None);
        prop_assert_eq!(
            cancel.is_ok(),
            JournalWorkflow::is_valid_transition(status, JournalStatus::Cancelled)
        );
    }

    /// Refused transitions report the current and requested status.
    #[test]
    fn prop_refusal_names_both_states(status in arb_status(), user in arb_user()) {
        if let Err(err) = JournalWorkflow::post(status, user) {
            prop_assert!(
                matches!(err, JournalError::InvalidState { from, to: JournalStatus::Posted } if from == status),
                "unexpected error"
            );
        }
    }

    /// Any sequence of operations from draft visits at most
    /// draft → posted → cancelled and never leaves cancelled.
    #[test]
    fn prop_lifecycle_is_monotonic(ops in arb_ops(), user in arb_user()) {
        let rank = |s: JournalStatus| match s {
            JournalStatus::Draft => 0,
            JournalStatus::Posted => 1,
            JournalStatus::Cancelled => 2,
        };

        let mut status = JournalStatus::Draft;
        let mut posts = 0;
        for op in ops {
            if let Ok(action) = apply(status, op, user) {
                prop_assert_eq!(action.expected_status(), status);
                let next = action.new_status();
                prop_assert!(rank(next) > rank(status));
                if next == JournalStatus::Posted {
                    posts += 1;
                }
                status = next;
            }
        }
        prop_assert!(posts <= 1);
    }

    /// The posting user is recorded on the action.
    #[test]
    fn prop_post_records_actor(user in arb_user()) {
        let action = JournalWorkflow::post(JournalStatus::Draft, user).unwrap();
        let recorded = matches!(action, JournalAction::Post { posted_by, .. } if posted_by == user);
        prop_assert!(recorded);
    }
}
