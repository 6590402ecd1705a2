//! JSON error responses.
//!
//! Every failure leaves the API as `{"error": CODE, "message": ...}` with the
//! status its domain error maps to. Server-side failures are logged here, once.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use koperasi_core::coa::CoaError;
use koperasi_core::journal::JournalError;
use koperasi_core::ledger::LedgerError;
use koperasi_core::reports::ReportError;
use koperasi_shared::AppError;
use serde_json::{Value, json};
use tracing::{error, warn};

/// An error ready to be rendered as a response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<Value>,
}

impl ApiError {
    /// Creates an error with an explicit status and code.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    /// 400 with a `VALIDATION_ERROR` code.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    /// Attaches machine-readable details to the body.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    fn from_parts(status: u16, code: &'static str, message: String) -> Self {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, code, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(code = self.code, error = %self.message, "Request failed");
        } else if self.status == StatusCode::CONFLICT {
            warn!(code = self.code, error = %self.message, "Request conflicted");
        }

        let mut body = json!({
            "error": self.code,
            "message": self.message,
        });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self::from_parts(e.status_code(), e.error_code(), e.to_string())
    }
}

impl From<CoaError> for ApiError {
    fn from(e: CoaError) -> Self {
        Self::from_parts(e.http_status_code(), e.error_code(), e.to_string())
    }
}

impl From<JournalError> for ApiError {
    fn from(e: JournalError) -> Self {
        let details = match &e {
            JournalError::UnbalancedEntry {
                debit,
                credit,
                delta,
            } => Some(json!({
                "total_debit": debit,
                "total_credit": credit,
                "delta": delta,
            })),
            JournalError::InvalidState { from, to } => Some(json!({
                "from": from,
                "to": to,
            })),
            _ => None,
        };
        let err = Self::from_parts(e.http_status_code(), e.error_code(), e.to_string());
        match details {
            Some(details) => err.with_details(details),
            None => err,
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        Self::from_parts(e.http_status_code(), e.error_code(), e.to_string())
    }
}

impl From<ReportError> for ApiError {
    fn from(e: ReportError) -> Self {
        Self::from_parts(e.http_status_code(), e.error_code(), e.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::validation(e.to_string())
    }
}
