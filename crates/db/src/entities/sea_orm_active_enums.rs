//! String-backed enums stored in `VARCHAR` columns with `CHECK` constraints.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum AccountCategory {
    #[sea_orm(string_value = "aset")]
    Aset,
    #[sea_orm(string_value = "kewajiban")]
    Kewajiban,
    #[sea_orm(string_value = "ekuitas")]
    Ekuitas,
    #[sea_orm(string_value = "pendapatan")]
    Pendapatan,
    #[sea_orm(string_value = "beban")]
    Beban,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum JournalStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "posted")]
    Posted,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl From<AccountCategory> for koperasi_core::coa::AccountCategory {
    fn from(value: AccountCategory) -> Self {
        match value {
            AccountCategory::Aset => Self::Aset,
            AccountCategory::Kewajiban => Self::Kewajiban,
            AccountCategory::Ekuitas => Self::Ekuitas,
            AccountCategory::Pendapatan => Self::Pendapatan,
            AccountCategory::Beban => Self::Beban,
        }
    }
}

impl From<koperasi_core::coa::AccountCategory> for AccountCategory {
    fn from(value: koperasi_core::coa::AccountCategory) -> Self {
        use koperasi_core::coa::AccountCategory as Core;
        match value {
            Core::Aset => Self::Aset,
            Core::Kewajiban => Self::Kewajiban,
            Core::Ekuitas => Self::Ekuitas,
            Core::Pendapatan => Self::Pendapatan,
            Core::Beban => Self::Beban,
        }
    }
}

impl From<JournalStatus> for koperasi_core::journal::JournalStatus {
    fn from(value: JournalStatus) -> Self {
        match value {
            JournalStatus::Draft => Self::Draft,
            JournalStatus::Posted => Self::Posted,
            JournalStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<koperasi_core::journal::JournalStatus> for JournalStatus {
    fn from(value: koperasi_core::journal::JournalStatus) -> Self {
        use koperasi_core::journal::JournalStatus as Core;
        match value {
            Core::Draft => Self::Draft,
            Core::Posted => Self::Posted,
            Core::Cancelled => Self::Cancelled,
        }
    }
}
