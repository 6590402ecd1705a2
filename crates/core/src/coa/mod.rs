//! Chart of accounts (COA) registry rules.
//!
//! The category of an account is the single source of truth for its normal
//! balance side. Nothing here touches storage; the repository prefetches what
//! the checks need and hands it in.
//!
//! # Modules
//!
//! - `types` - Categories, normal sides and account records
//! - `error` - COA error taxonomy
//! - `service` - Validation of new accounts and account changes
//! - `template` - Default koperasi chart of accounts

pub mod error;
pub mod service;
pub mod template;
pub mod types;

pub use error::CoaError;
pub use service::{CoaService, ParentInfo, ValidatedAccount};
pub use template::{TemplateAccount, default_chart};
pub use types::{
    Account, AccountCategory, AccountChanges, CategoryInfo, NewAccount, NormalBalance,
    ParentChange, kategori_list,
};
