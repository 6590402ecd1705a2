//! Journal error types for validation and state errors.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::journal::types::JournalStatus;

/// Errors that can occur while creating or transitioning journal entries.
///
/// Line numbers in messages are 1-based.
#[derive(Debug, Error)]
pub enum JournalError {
    // ========== Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines, got {0}")]
    InsufficientLines(usize),

    /// Description is empty or too long.
    #[error("Invalid description: {0}")]
    InvalidDescription(String),

    /// Source document reference is malformed.
    #[error("Invalid source reference: {0}")]
    InvalidSource(String),

    /// Line amount is negative.
    #[error("Line {line}: amounts cannot be negative")]
    NegativeAmount {
        /// Offending line.
        line: usize,
    },

    /// Line has neither a debit nor a credit.
    #[error("Line {line}: either debit or credit must be greater than zero")]
    ZeroAmount {
        /// Offending line.
        line: usize,
    },

    /// Line has both a debit and a credit.
    #[error("Line {line}: a line cannot carry both debit and credit")]
    BothSides {
        /// Offending line.
        line: usize,
    },

    /// Line amount has more decimal places than the ledger stores.
    #[error("Line {line}: amounts allow at most {max_scale} decimal places")]
    ExcessPrecision {
        /// Offending line.
        line: usize,
        /// Allowed decimal places.
        max_scale: u32,
    },

    /// Line amount is beyond what the ledger stores.
    #[error("Line {line}: amount must be less than {limit}")]
    AmountTooLarge {
        /// Offending line.
        line: usize,
        /// Exclusive upper bound.
        limit: Decimal,
    },

    /// Debit or credit total is beyond what the ledger stores.
    #[error("Journal entry totals must be less than {0}")]
    TotalTooLarge(Decimal),

    /// Line memo is too long.
    #[error("Line {line}: memo is too long")]
    MemoTooLong {
        /// Offending line.
        line: usize,
    },

    /// Line references an account that does not exist.
    #[error("Line {line}: account {account_id} not found")]
    AccountNotFound {
        /// Offending line.
        line: usize,
        /// Referenced account.
        account_id: Uuid,
    },

    /// Line references an account of another koperasi.
    #[error("Line {line}: account {account_id} does not belong to this koperasi")]
    AccountOutOfScope {
        /// Offending line.
        line: usize,
        /// Referenced account.
        account_id: Uuid,
    },

    /// Line references an inactive account.
    #[error("Line {line}: account {code} is inactive")]
    AccountInactive {
        /// Offending line.
        line: usize,
        /// Account code.
        code: String,
    },

    // ========== Balance Errors ==========
    /// Debits and credits differ.
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}, Delta: {delta}")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
        /// `debit - credit`.
        delta: Decimal,
    },

    // ========== State Errors ==========
    /// Status transition not permitted.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidState {
        /// Current status.
        from: JournalStatus,
        /// Requested status.
        to: JournalStatus,
    },

    /// Entry not found in the caller's scope.
    #[error("Journal entry not found: {0}")]
    NotFound(Uuid),

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl JournalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines(_) => "INSUFFICIENT_LINES",
            Self::InvalidDescription(_) => "INVALID_DESCRIPTION",
            Self::InvalidSource(_) => "INVALID_SOURCE_REFERENCE",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::ZeroAmount { .. } => "ZERO_AMOUNT",
            Self::BothSides { .. } => "INVALID_LINE_SIDES",
            Self::ExcessPrecision { .. } => "INVALID_AMOUNT_PRECISION",
            Self::AmountTooLarge { .. } | Self::TotalTooLarge(_) => "AMOUNT_TOO_LARGE",
            Self::MemoTooLong { .. } => "INVALID_MEMO",
            Self::AccountNotFound { .. } => "ACCOUNT_NOT_FOUND",
            Self::AccountOutOfScope { .. } => "ACCOUNT_OUT_OF_SCOPE",
            Self::AccountInactive { .. } => "ACCOUNT_INACTIVE",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::NotFound(_) => "JOURNAL_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation and balance errors
            Self::InsufficientLines(_)
            | Self::InvalidDescription(_)
            | Self::InvalidSource(_)
            | Self::NegativeAmount { .. }
            | Self::ZeroAmount { .. }
            | Self::BothSides { .. }
            | Self::ExcessPrecision { .. }
            | Self::AmountTooLarge { .. }
            | Self::TotalTooLarge(_)
            | Self::MemoTooLong { .. }
            | Self::AccountNotFound { .. }
            | Self::AccountOutOfScope { .. }
            | Self::AccountInactive { .. }
            | Self::UnbalancedEntry { .. } => 400,

            // 404 Not Found
            Self::NotFound(_) => 404,

            // 409 Conflict - illegal transition
            Self::InvalidState { .. } => 409,

            // 500 Internal Server Error
            Self::Database(_) => 500,
        }
    }

    /// Builds the unbalanced error for the given totals.
    #[must_use]
    pub fn unbalanced(debit: Decimal, credit: Decimal) -> Self {
        Self::UnbalancedEntry {
            debit,
            credit,
            delta: debit - credit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unbalanced_reports_delta() {
        let err = JournalError::unbalanced(dec!(50000), dec!(40000));
        assert!(matches!(
            err,
            JournalError::UnbalancedEntry { delta, .. } if delta == dec!(10000)
        ));
        assert_eq!(err.error_code(), "UNBALANCED_ENTRY");
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(
            err.to_string(),
            "Journal entry is not balanced. Debit: 50000, Credit: 40000, Delta: 10000"
        );
    }

    #[test]
    fn test_invalid_state_is_conflict() {
        let err = JournalError::InvalidState {
            from: JournalStatus::Cancelled,
            to: JournalStatus::Posted,
        };
        assert_eq!(err.http_status_code(), 409);
        assert_eq!(err.error_code(), "INVALID_STATE");
        assert_eq!(
            err.to_string(),
            "Invalid status transition from cancelled to posted"
        );
    }

    #[test]
    fn test_line_errors_are_bad_requests() {
        assert_eq!(JournalError::ZeroAmount { line: 1 }.http_status_code(), 400);
        assert_eq!(JournalError::BothSides { line: 2 }.http_status_code(), 400);
        assert_eq!(
            JournalError::AccountInactive {
                line: 1,
                code: "1-1000".into()
            }
            .to_string(),
            "Line 1: account 1-1000 is inactive"
        );
    }

    #[test]
    fn test_not_found_and_database() {
        assert_eq!(JournalError::NotFound(Uuid::nil()).http_status_code(), 404);
        assert_eq!(JournalError::Database("x".into()).http_status_code(), 500);
    }
}
