//! Chart of accounts domain types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use koperasi_shared::types::{AccountId, KoperasiId, TenantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::coa::error::CoaError;

/// Side on which an account's balance normally sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Increased by debits (Aset, Beban).
    Debit,
    /// Increased by credits (Kewajiban, Ekuitas, Pendapatan).
    Credit,
}

impl NormalBalance {
    /// Returns the string representation of the side.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }

    /// Expresses raw debit and credit totals as a balance on this side.
    ///
    /// - Debit-normal: `debit - credit`
    /// - Credit-normal: `credit - debit`
    ///
    /// A negative result marks an abnormal (contra) position and is returned
    /// as is.
    #[must_use]
    pub fn normalize(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

impl fmt::Display for NormalBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five account categories (kategori akun).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountCategory {
    /// Asset.
    Aset,
    /// Liability.
    Kewajiban,
    /// Equity.
    Ekuitas,
    /// Revenue.
    Pendapatan,
    /// Expense.
    Beban,
}

impl AccountCategory {
    /// All categories in chart order.
    pub const ALL: [Self; 5] = [
        Self::Aset,
        Self::Kewajiban,
        Self::Ekuitas,
        Self::Pendapatan,
        Self::Beban,
    ];

    /// Returns the string representation used in storage and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Aset => "aset",
            Self::Kewajiban => "kewajiban",
            Self::Ekuitas => "ekuitas",
            Self::Pendapatan => "pendapatan",
            Self::Beban => "beban",
        }
    }

    /// Display name in Indonesian.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Aset => "Aset",
            Self::Kewajiban => "Kewajiban",
            Self::Ekuitas => "Ekuitas",
            Self::Pendapatan => "Pendapatan",
            Self::Beban => "Beban",
        }
    }

    /// Display name in English.
    #[must_use]
    pub const fn english_name(&self) -> &'static str {
        match self {
            Self::Aset => "Asset",
            Self::Kewajiban => "Liability",
            Self::Ekuitas => "Equity",
            Self::Pendapatan => "Revenue",
            Self::Beban => "Expense",
        }
    }

    /// The normal balance side, fixed by the category.
    #[must_use]
    pub const fn normal_balance(&self) -> NormalBalance {
        match self {
            Self::Aset | Self::Beban => NormalBalance::Debit,
            Self::Kewajiban | Self::Ekuitas | Self::Pendapatan => NormalBalance::Credit,
        }
    }

    /// Leading digit conventionally used for account codes of this category.
    #[must_use]
    pub const fn code_prefix(&self) -> char {
        match self {
            Self::Aset => '1',
            Self::Kewajiban => '2',
            Self::Ekuitas => '3',
            Self::Pendapatan => '4',
            Self::Beban => '5',
        }
    }

    /// Whether the category is a period-flow account reported on the
    /// income statement.
    #[must_use]
    pub const fn is_income_statement(&self) -> bool {
        matches!(self, Self::Pendapatan | Self::Beban)
    }
}

impl fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountCategory {
    type Err = CoaError;

    /// Accepts Indonesian and English names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aset" | "asset" | "assets" => Ok(Self::Aset),
            "kewajiban" | "liability" | "liabilities" => Ok(Self::Kewajiban),
            "ekuitas" | "modal" | "equity" => Ok(Self::Ekuitas),
            "pendapatan" | "revenue" | "income" => Ok(Self::Pendapatan),
            "beban" | "expense" | "expenses" => Ok(Self::Beban),
            _ => Err(CoaError::InvalidCategory(s.to_string())),
        }
    }
}

/// Static reference entry describing one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    /// The category.
    pub kategori: AccountCategory,
    /// Indonesian display name.
    pub nama: &'static str,
    /// English display name.
    pub name_en: &'static str,
    /// Normal balance side.
    pub normal_balance: NormalBalance,
    /// Conventional leading code digit.
    pub code_prefix: char,
}

/// Returns the fixed list of the five categories.
#[must_use]
pub fn kategori_list() -> Vec<CategoryInfo> {
    AccountCategory::ALL
        .iter()
        .map(|category| CategoryInfo {
            kategori: *category,
            nama: category.display_name(),
            name_en: category.english_name(),
            normal_balance: category.normal_balance(),
            code_prefix: category.code_prefix(),
        })
        .collect()
}

/// A chart of accounts entry as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Owning koperasi.
    pub koperasi_id: KoperasiId,
    /// Hierarchical code, unique within the koperasi.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Category.
    pub category: AccountCategory,
    /// Parent account, if any.
    pub parent_id: Option<AccountId>,
    /// Free-text description.
    pub description: Option<String>,
    /// Whether the account accepts new journal lines.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// The normal balance side, derived from the category.
    #[must_use]
    pub const fn normal_balance(&self) -> NormalBalance {
        self.category.normal_balance()
    }
}

/// Input for creating an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Category.
    pub category: AccountCategory,
    /// Code of the parent account.
    pub parent_code: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
}

/// How an update treats the parent link.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParentChange {
    /// Leave the parent as is.
    #[default]
    Keep,
    /// Detach from the current parent.
    Clear,
    /// Move under the account with this code.
    Set(String),
}

/// Input for updating an account. `None` fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountChanges {
    /// New name.
    pub name: Option<String>,
    /// New category.
    pub category: Option<AccountCategory>,
    /// Parent change.
    pub parent: ParentChange,
    /// New description.
    pub description: Option<String>,
    /// Activate or deactivate.
    pub is_active: Option<bool>,
}
