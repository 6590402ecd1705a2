//! Account balance calculations.
//!
//! Balances are never stored. The repository streams journal lines with the
//! status and date of their entry; everything below decides which lines count
//! and how they fold into a balance.

use std::collections::HashMap;

use chrono::NaiveDate;
use koperasi_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::coa::types::{Account, AccountCategory, NormalBalance};
use crate::journal::types::JournalStatus;

/// A journal line joined with the date and status of its entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerLine {
    /// Account the line posts to.
    pub account_id: AccountId,
    /// Entry transaction date.
    pub entry_date: NaiveDate,
    /// Entry status.
    pub status: JournalStatus,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

impl LedgerLine {
    /// Returns true if the line counts toward balances as of `as_of`.
    #[must_use]
    pub fn counts_at(&self, as_of: NaiveDate) -> bool {
        self.status.affects_balances() && self.entry_date <= as_of
    }
}

/// Raw debit and credit sums for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AccountTotals {
    /// Sum of debits.
    pub debit: Decimal,
    /// Sum of credits.
    pub credit: Decimal,
}

impl AccountTotals {
    /// Adds one line's amounts.
    pub fn add(&mut self, debit: Decimal, credit: Decimal) {
        self.debit += debit;
        self.credit += credit;
    }

    /// The balance on the given normal side.
    #[must_use]
    pub fn balance(&self, side: NormalBalance) -> Decimal {
        side.normalize(self.debit, self.credit)
    }
}

/// Sums posted lines dated on or before `as_of`, per account.
///
/// Draft and cancelled lines are skipped, so cancelling an entry removes its
/// effect from every balance computed afterwards.
pub fn accumulate<I>(lines: I, as_of: NaiveDate) -> HashMap<AccountId, AccountTotals>
where
    I: IntoIterator<Item = LedgerLine>,
{
    let mut totals: HashMap<AccountId, AccountTotals> = HashMap::new();
    for line in lines.into_iter().filter(|l| l.counts_at(as_of)) {
        totals
            .entry(line.account_id)
            .or_default()
            .add(line.debit, line.credit);
    }
    totals
}

/// Balance of one account at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountBalance {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Category.
    pub category: AccountCategory,
    /// Normal side, derived from the category.
    pub normal_balance: NormalBalance,
    /// Whether the account is active.
    pub is_active: bool,
    /// Sum of posted debits.
    pub total_debit: Decimal,
    /// Sum of posted credits.
    pub total_credit: Decimal,
    /// Balance on the normal side; negative for a contra position.
    pub balance: Decimal,
}

impl AccountBalance {
    /// Builds the balance of `account` from its totals.
    #[must_use]
    pub fn from_totals(account: &Account, totals: AccountTotals) -> Self {
        let normal_balance = account.normal_balance();
        Self {
            account_id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            category: account.category,
            normal_balance,
            is_active: account.is_active,
            total_debit: totals.debit,
            total_credit: totals.credit,
            balance: totals.balance(normal_balance),
        }
    }
}

/// Computes the balance of every account in `accounts` as of `as_of`,
/// ordered by code.
///
/// Accounts without counted lines get zero balances.
pub fn balances_as_of<I>(accounts: &[Account], lines: I, as_of: NaiveDate) -> Vec<AccountBalance>
where
    I: IntoIterator<Item = LedgerLine>,
{
    let totals = accumulate(lines, as_of);
    let mut balances: Vec<AccountBalance> = accounts
        .iter()
        .map(|a| AccountBalance::from_totals(a, totals.get(&a.id).copied().unwrap_or_default()))
        .collect();
    balances.sort_by(|a, b| a.code.cmp(&b.code));
    balances
}
