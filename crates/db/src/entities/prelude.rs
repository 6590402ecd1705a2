//! Entity re-exports.

pub use super::coa_accounts::Entity as CoaAccounts;
pub use super::journal_entries::Entity as JournalEntries;
pub use super::journal_lines::Entity as JournalLines;
