//! Repository abstractions for data access.
//!
//! Every method takes the caller's [`RequestContext`](koperasi_shared::RequestContext)
//! and filters by its tenant and koperasi; rows outside that scope behave as
//! if they did not exist.

pub mod account;
pub mod journal;
pub mod ledger;
pub mod report;

pub use account::{AccountFilter, AccountRepository};
pub use journal::JournalRepository;
pub use ledger::LedgerRepository;
pub use report::ReportRepository;
