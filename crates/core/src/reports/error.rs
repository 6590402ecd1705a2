//! Report error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::ledger::error::LedgerError;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Period start is after its end.
    #[error("Invalid date range: start {from} is after end {to}")]
    InvalidDateRange {
        /// Period start.
        from: NaiveDate,
        /// Period end.
        to: NaiveDate,
    },

    /// Debit-normal and credit-normal balances disagree.
    ///
    /// Posted entries are balanced one by one, so this means the stored ledger
    /// is corrupt. It is reported, never patched over.
    #[error(
        "Ledger integrity violation: debit-normal total {left} does not equal credit-normal total {right} (difference {difference})"
    )]
    LedgerIntegrity {
        /// `Aset + Beban`.
        left: Decimal,
        /// `Kewajiban + Ekuitas + Pendapatan`.
        right: Decimal,
        /// `left - right`.
        difference: Decimal,
    },

    /// Account not found in the caller's scope.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::LedgerIntegrity { .. } => "LEDGER_INTEGRITY_ERROR",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidDateRange { .. } => 400,
            Self::AccountNotFound(_) => 404,
            Self::LedgerIntegrity { .. } | Self::Database(_) => 500,
        }
    }
}

impl From<LedgerError> for ReportError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AccountNotFound(id) => Self::AccountNotFound(id),
            LedgerError::InvalidDateRange { from, to } => Self::InvalidDateRange { from, to },
            LedgerError::Database(msg) => Self::Database(msg),
        }
    }
}
