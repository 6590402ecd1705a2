//! Ledger queries over posted journal lines.
//!
//! # Modules
//!
//! - `balance` - Point-in-time account balances
//! - `query` - Journal listing filters
//! - `error` - Ledger query errors

pub mod balance;
pub mod error;
pub mod query;

#[cfg(test)]
mod balance_props;

pub use balance::{AccountBalance, AccountTotals, LedgerLine, accumulate, balances_as_of};
pub use error::LedgerError;
pub use query::JournalFilter;
