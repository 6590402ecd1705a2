//! Ledger domain logic for the koperasi platform.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here; the db crate
//! fetches and persists, this crate decides.
//!
//! # Modules
//!
//! - `coa` - Chart of accounts classification and validation
//! - `journal` - Journal entry validation and the draft/posted/cancelled lifecycle
//! - `ledger` - Balance computation from posted journal lines
//! - `reports` - Trial balance, income statement and balance sheet
//! - `events` - Optional notification hook for ledger changes

pub mod coa;
pub mod events;
pub mod journal;
pub mod ledger;
pub mod reports;
