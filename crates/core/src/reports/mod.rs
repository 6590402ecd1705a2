//! Financial statements.
//!
//! - Trial balance (neraca saldo)
//! - Income statement (laporan laba rugi)
//! - Balance sheet (neraca)

pub mod error;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
