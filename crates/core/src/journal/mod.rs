//! Journal entries (jurnal umum).
//!
//! # Modules
//!
//! - `types` - Entry, line and status types
//! - `error` - Journal error taxonomy
//! - `service` - Validation of new entries and the balance rule
//! - `workflow` - Draft/posted/cancelled transitions

pub mod error;
pub mod service;
pub mod types;
pub mod workflow;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod workflow_props;

pub use error::JournalError;
pub use service::{JournalService, MAX_AMOUNT, MONEY_SCALE};
pub use types::{
    JournalEntry, JournalLine, JournalLineInput, JournalStatus, JournalTotals, LineAccount,
    NewJournalEntry, SourceKind, SourceRef, ValidatedJournal, ValidatedLine,
};
pub use workflow::{JournalAction, JournalWorkflow};
