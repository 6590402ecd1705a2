//! `SeaORM` entity definitions for the ledger tables.

pub mod prelude;

pub mod coa_accounts;
pub mod journal_entries;
pub mod journal_lines;
pub mod sea_orm_active_enums;
