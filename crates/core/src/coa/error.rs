//! Chart of accounts error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while managing the chart of accounts.
#[derive(Debug, Error)]
pub enum CoaError {
    // ========== Validation Errors ==========
    /// Account code is empty, too long or has characters outside `[0-9A-Za-z.-]`.
    #[error("Invalid account code '{0}'")]
    InvalidCode(String),

    /// Account name is empty or too long.
    #[error("Invalid account name: {0}")]
    InvalidName(String),

    /// Description is too long.
    #[error("Invalid account description: {0}")]
    InvalidDescription(String),

    /// Category is not one of the five recognized values.
    #[error("Unknown account category '{0}'")]
    InvalidCategory(String),

    /// Code already used by another account of the koperasi.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Parent account does not exist in the koperasi.
    #[error("Parent account '{0}' not found")]
    ParentNotFound(String),

    /// Parent account is inactive.
    #[error("Parent account '{0}' is inactive")]
    ParentInactive(String),

    /// The requested parent would make the hierarchy cyclic.
    #[error("Account '{0}' cannot be placed under itself or one of its descendants")]
    ParentCycle(String),

    // ========== Conflict Errors ==========
    /// Category change refused because posted journal lines reference the account.
    #[error("Cannot change the category of account '{0}' because it has posted journal lines")]
    CategoryLocked(String),

    // ========== Lookup Errors ==========
    /// Account not found in the caller's scope.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl CoaError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCode(_) => "INVALID_ACCOUNT_CODE",
            Self::InvalidName(_) => "INVALID_ACCOUNT_NAME",
            Self::InvalidDescription(_) => "INVALID_ACCOUNT_DESCRIPTION",
            Self::InvalidCategory(_) => "INVALID_CATEGORY",
            Self::DuplicateCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::ParentInactive(_) => "PARENT_INACTIVE",
            Self::ParentCycle(_) => "PARENT_CYCLE",
            Self::CategoryLocked(_) => "CATEGORY_CHANGE_CONFLICT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidCode(_)
            | Self::InvalidName(_)
            | Self::InvalidDescription(_)
            | Self::InvalidCategory(_)
            | Self::DuplicateCode(_)
            | Self::ParentNotFound(_)
            | Self::ParentInactive(_)
            | Self::ParentCycle(_) => 400,
            Self::CategoryLocked(_) => 409,
            Self::AccountNotFound(_) => 404,
            Self::Database(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_bad_requests() {
        assert_eq!(CoaError::DuplicateCode("1-1000".into()).http_status_code(), 400);
        assert_eq!(CoaError::ParentInactive("1".into()).http_status_code(), 400);
        assert_eq!(CoaError::InvalidCategory("x".into()).http_status_code(), 400);
    }

    #[test]
    fn test_category_lock_is_conflict() {
        let err = CoaError::CategoryLocked("1-1000".into());
        assert_eq!(err.http_status_code(), 409);
        assert_eq!(err.error_code(), "CATEGORY_CHANGE_CONFLICT");
        assert_eq!(
            err.to_string(),
            "Cannot change the category of account '1-1000' because it has posted journal lines"
        );
    }

    #[test]
    fn test_not_found_and_database() {
        assert_eq!(CoaError::AccountNotFound(Uuid::nil()).http_status_code(), 404);
        assert_eq!(CoaError::Database("timeout".into()).http_status_code(), 500);
    }
}
