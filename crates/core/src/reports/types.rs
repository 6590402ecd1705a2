//! Report data types.

use chrono::NaiveDate;
use koperasi_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::coa::types::{AccountCategory, NormalBalance};

/// One account row of the trial balance (neraca saldo).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialBalanceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Category.
    pub category: AccountCategory,
    /// Normal side.
    pub normal_balance: NormalBalance,
    /// Debit column.
    pub debit: Decimal,
    /// Credit column.
    pub credit: Decimal,
    /// Balance on the normal side.
    pub balance: Decimal,
}

/// Sum of balances of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    /// Category.
    pub category: AccountCategory,
    /// Sum of normal-side balances.
    pub total: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialBalanceReport {
    /// As of date.
    pub as_of: NaiveDate,
    /// Rows ordered by account code.
    pub rows: Vec<TrialBalanceRow>,
    /// One total per category, in category order.
    pub category_totals: Vec<CategoryTotal>,
    /// Sum of the debit column.
    pub total_debit: Decimal,
    /// Sum of the credit column.
    pub total_credit: Decimal,
    /// Whether both columns agree. Always true for a report that was built.
    pub is_balanced: bool,
}

impl TrialBalanceReport {
    /// Returns the total of one category.
    #[must_use]
    pub fn category_total(&self, category: AccountCategory) -> Decimal {
        self.category_totals
            .iter()
            .find(|t| t.category == category)
            .map_or(Decimal::ZERO, |t| t.total)
    }
}

/// One account line in a statement section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementLine {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Amount on the account's normal side.
    pub amount: Decimal,
}

/// A group of statement lines with their total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatementSection {
    /// Lines ordered by account code.
    pub lines: Vec<StatementLine>,
    /// Section total.
    pub total: Decimal,
}

impl StatementSection {
    pub(crate) fn push(&mut self, line: StatementLine) {
        self.total += line.amount;
        self.lines.push(line);
    }
}

/// Income statement (laporan laba rugi) for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeStatementReport {
    /// First day of the period.
    pub date_from: NaiveDate,
    /// Last day of the period.
    pub date_to: NaiveDate,
    /// Revenue (pendapatan) accounts.
    pub revenue: StatementSection,
    /// Expense (beban) accounts.
    pub expenses: StatementSection,
    /// Revenue total.
    pub total_revenue: Decimal,
    /// Expense total.
    pub total_expense: Decimal,
    /// `total_revenue - total_expense`.
    pub net_income: Decimal,
}

/// Balance sheet (neraca) at a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceSheetReport {
    /// As of date.
    pub as_of: NaiveDate,
    /// Asset accounts.
    pub assets: StatementSection,
    /// Liability accounts.
    pub liabilities: StatementSection,
    /// Equity accounts, excluding retained earnings.
    pub equity: StatementSection,
    /// Cumulative revenue minus expense up to `as_of`.
    pub retained_earnings: Decimal,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Equity section total plus retained earnings.
    pub total_equity: Decimal,
    /// `total_liabilities + total_equity`.
    pub liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity. Always true for a report
    /// that was built.
    pub is_balanced: bool,
}
