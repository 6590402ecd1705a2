//! Journal entry lifecycle.
//!
//! Transitions are decided here and applied by the repository with a
//! compare-and-swap on the stored status, so a transition computed from a
//! stale read never lands.

use chrono::{DateTime, Utc};
use koperasi_shared::types::UserId;
use serde::Serialize;

use crate::journal::error::JournalError;
use crate::journal::types::JournalStatus;

/// Longest accepted cancellation reason.
pub const MAX_CANCEL_REASON_LEN: usize = 500;

/// A permitted transition together with its audit fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum JournalAction {
    /// Draft → Posted.
    Post {
        /// Status after the transition.
        new_status: JournalStatus,
        /// User posting the entry.
        posted_by: UserId,
        /// When the entry was posted.
        posted_at: DateTime<Utc>,
    },
    /// Draft or Posted → Cancelled.
    Cancel {
        /// Status the entry leaves.
        from: JournalStatus,
        /// Status after the transition.
        new_status: JournalStatus,
        /// User cancelling the entry.
        cancelled_by: UserId,
        /// When the entry was cancelled.
        cancelled_at: DateTime<Utc>,
        /// Optional reason.
        reason: Option<String>,
    },
}

impl JournalAction {
    /// Returns the status the entry ends up in.
    #[must_use]
    pub const fn new_status(&self) -> JournalStatus {
        match self {
            Self::Post { new_status, .. } | Self::Cancel { new_status, .. } => *new_status,
        }
    }

    /// Returns the status the entry must currently hold for the action to apply.
    #[must_use]
    pub const fn expected_status(&self) -> JournalStatus {
        match self {
            Self::Post { .. } => JournalStatus::Draft,
            Self::Cancel { from, .. } => *from,
        }
    }
}

/// Stateless service for journal status transitions.
pub struct JournalWorkflow;

impl JournalWorkflow {
    /// Post a draft entry.
    ///
    /// # Errors
    /// `InvalidState` unless the entry is a draft.
    pub fn post(current: JournalStatus, posted_by: UserId) -> Result<JournalAction, JournalError> {
        match current {
            JournalStatus::Draft => Ok(JournalAction::Post {
                new_status: JournalStatus::Posted,
                posted_by,
                posted_at: Utc::now(),
            }),
            _ => Err(JournalError::InvalidState {
                from: current,
                to: JournalStatus::Posted,
            }),
        }
    }

    /// Cancel a draft or posted entry.
    ///
    /// A blank reason is stored as no reason.
    ///
    /// # Errors
    /// `InvalidState` if the entry is already cancelled, `InvalidDescription`
    /// if the reason is too long.
    pub fn cancel(
        current: JournalStatus,
        cancelled_by: UserId,
        reason: Option<String>,
    ) -> Result<JournalAction, JournalError> {
        if current.is_terminal() {
            return Err(JournalError::InvalidState {
                from: current,
                to: JournalStatus::Cancelled,
            });
        }

        let reason = match reason.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(r) if r.chars().count() > MAX_CANCEL_REASON_LEN => {
                return Err(JournalError::InvalidDescription(format!(
                    "cancel reason exceeds {MAX_CANCEL_REASON_LEN} characters"
                )));
            }
            Some(r) => Some(r.to_string()),
        };

        Ok(JournalAction::Cancel {
            from: current,
            new_status: JournalStatus::Cancelled,
            cancelled_by,
            cancelled_at: Utc::now(),
            reason,
        })
    }

    /// Returns true if `from → to` is a permitted transition.
    #[must_use]
    pub const fn is_valid_transition(from: JournalStatus, to: JournalStatus) -> bool {
        matches!(
            (from, to),
            (JournalStatus::Draft, JournalStatus::Posted)
                | (JournalStatus::Draft | JournalStatus::Posted, JournalStatus::Cancelled)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_from_draft() {
        let user = UserId::new();
        let action = JournalWorkflow::post(JournalStatus::Draft, user).unwrap();
        assert_eq!(action.new_status(), JournalStatus::Posted);
        assert_eq!(action.expected_status(), JournalStatus::Draft);
        assert!(matches!(action, JournalAction::Post { posted_by, .. } if posted_by == user));
    }

    #[test]
    fn test_post_twice_is_invalid_state() {
        let err = JournalWorkflow::post(JournalStatus::Posted, UserId::new()).unwrap_err();
        assert!(matches!(
            err,
            JournalError::InvalidState {
                from: JournalStatus::Posted,
                to: JournalStatus::Posted
            }
        ));
    }

    #[test]
    fn test_post_after_cancel_is_invalid_state() {
        assert!(JournalWorkflow::post(JournalStatus::Cancelled, UserId::new()).is_err());
    }

    #[test]
    fn test_cancel_from_draft_and_posted() {
        for from in [JournalStatus::Draft, JournalStatus::Posted] {
            let action =
                JournalWorkflow::cancel(from, UserId::new(), Some(" salah input ".into())).unwrap();
            assert_eq!(action.new_status(), JournalStatus::Cancelled);
            assert_eq!(action.expected_status(), from);
            assert!(matches!(
                action,
                JournalAction::Cancel { reason: Some(ref r), .. } if r == "salah input"
            ));
        }
    }

    #[test]
    fn test_cancel_twice_is_invalid_state() {
        let err = JournalWorkflow::cancel(JournalStatus::Cancelled, UserId::new(), None).unwrap_err();
        assert_eq!(err.http_status_code(), 409);
    }

    #[test]
    fn test_cancel_blank_reason_is_none() {
        let action =
            JournalWorkflow::cancel(JournalStatus::Draft, UserId::new(), Some("   ".into())).unwrap();
        assert!(matches!(action, JournalAction::Cancel { reason: None, .. }));
    }

    #[test]
    fn test_cancel_reason_too_long() {
        let reason = "x".repeat(MAX_CANCEL_REASON_LEN + 1);
        assert!(matches!(
            JournalWorkflow::cancel(JournalStatus::Draft, UserId::new(), Some(reason)),
            Err(JournalError::InvalidDescription(_))
        ));
    }

    #[test]
    fn test_transition_table() {
        use JournalStatus::{Cancelled, Draft, Posted};
        assert!(JournalWorkflow::is_valid_transition(Draft, Posted));
        assert!(JournalWorkflow::is_valid_transition(Draft, Cancelled));
        assert!(JournalWorkflow::is_valid_transition(Posted, Cancelled));
        assert!(!JournalWorkflow::is_valid_transition(Posted, Draft));
        assert!(!JournalWorkflow::is_valid_transition(Cancelled, Posted));
        assert!(!JournalWorkflow::is_valid_transition(Cancelled, Draft));
        assert!(!JournalWorkflow::is_valid_transition(Draft, Draft));
    }
}
