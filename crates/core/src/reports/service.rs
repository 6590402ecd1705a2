//! Report generation service.
//!
//! Every statement is derived from [`AccountBalance`] values computed by the
//! ledger; nothing here reads storage.

use std::collections::HashMap;

use chrono::NaiveDate;
use koperasi_shared::types::AccountId;
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{
    BalanceSheetReport, CategoryTotal, IncomeStatementReport, StatementLine, StatementSection,
    TrialBalanceReport, TrialBalanceRow,
};
use crate::coa::types::{AccountCategory, NormalBalance};
use crate::ledger::balance::AccountBalance;

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Generates the trial balance as of `as_of`.
    ///
    /// Active accounts are always listed. Inactive accounts are listed only
    /// while they still carry a balance.
    ///
    /// # Errors
    /// `LedgerIntegrity` if `Aset + Beban != Kewajiban + Ekuitas + Pendapatan`.
    pub fn trial_balance(
        as_of: NaiveDate,
        balances: &[AccountBalance],
    ) -> Result<TrialBalanceReport, ReportError> {
        Self::check_identity(balances)?;

        let mut rows: Vec<TrialBalanceRow> = balances
            .iter()
            .filter(|b| Self::is_reported(b))
            .map(|b| {
                let (debit, credit) = Self::columns(b.normal_balance, b.balance);
                TrialBalanceRow {
                    account_id: b.account_id,
                    code: b.code.clone(),
                    name: b.name.clone(),
                    category: b.category,
                    normal_balance: b.normal_balance,
                    debit,
                    credit,
                    balance: b.balance,
                }
            })
            .collect();
        rows.sort_by(|a, b| a.code.cmp(&b.code));

        let total_debit: Decimal = rows.iter().map(|r| r.debit).sum();
        let total_credit: Decimal = rows.iter().map(|r| r.credit).sum();

        Ok(TrialBalanceReport {
            as_of,
            category_totals: Self::category_totals(balances),
            rows,
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        })
    }

    /// Generates the income statement for `date_from..=date_to`.
    ///
    /// Each revenue and expense account contributes
    /// `balance(date_to) - balance(date_from - 1 day)`.
    ///
    /// # Arguments
    /// * `opening` - Balances as of the day before `date_from`
    /// * `closing` - Balances as of `date_to`
    ///
    /// # Errors
    /// `InvalidDateRange` if `date_from > date_to`.
    pub fn income_statement(
        date_from: NaiveDate,
        date_to: NaiveDate,
        opening: &[AccountBalance],
        closing: &[AccountBalance],
    ) -> Result<IncomeStatementReport, ReportError> {
        if date_from > date_to {
            return Err(ReportError::InvalidDateRange {
                from: date_from,
                to: date_to,
            });
        }

        let opening: HashMap<AccountId, Decimal> =
            opening.iter().map(|b| (b.account_id, b.balance)).collect();

        let mut closing: Vec<&AccountBalance> = closing
            .iter()
            .filter(|b| b.category.is_income_statement())
            .collect();
        closing.sort_by(|a, b| a.code.cmp(&b.code));

        let mut revenue = StatementSection::default();
        let mut expenses = StatementSection::default();
        for balance in closing {
            let amount =
                balance.balance - opening.get(&balance.account_id).copied().unwrap_or_default();
            if !balance.is_active && amount.is_zero() {
                continue;
            }
            let line = StatementLine {
                account_id: balance.account_id,
                code: balance.code.clone(),
                name: balance.name.clone(),
                amount,
            };
            match balance.category {
                AccountCategory::Pendapatan => revenue.push(line),
                AccountCategory::Beban => expenses.push(line),
                _ => {}
            }
        }

        let total_revenue = revenue.total;
        let total_expense = expenses.total;
        Ok(IncomeStatementReport {
            date_from,
            date_to,
            revenue,
            expenses,
            total_revenue,
            total_expense,
            net_income: total_revenue - total_expense,
        })
    }

    /// Generates the balance sheet as of `as_of`.
    ///
    /// Revenue and expense accounts are folded into equity as retained
    /// earnings, so `assets == liabilities + equity` holds whenever the trial
    /// balance does.
    ///
    /// # Errors
    /// `LedgerIntegrity` if the underlying trial balance does not balance.
    pub fn balance_sheet(
        as_of: NaiveDate,
        balances: &[AccountBalance],
    ) -> Result<BalanceSheetReport, ReportError> {
        Self::check_identity(balances)?;

        let mut sorted: Vec<&AccountBalance> =
            balances.iter().filter(|b| Self::is_reported(b)).collect();
        sorted.sort_by(|a, b| a.code.cmp(&b.code));

        let mut assets = StatementSection::default();
        let mut liabilities = StatementSection::default();
        let mut equity = StatementSection::default();
        for balance in sorted {
            let section = match balance.category {
                AccountCategory::Aset => &mut assets,
                AccountCategory::Kewajiban => &mut liabilities,
                AccountCategory::Ekuitas => &mut equity,
                AccountCategory::Pendapatan | AccountCategory::Beban => continue,
            };
            section.push(StatementLine {
                account_id: balance.account_id,
                code: balance.code.clone(),
                name: balance.name.clone(),
                amount: balance.balance,
            });
        }

        let retained_earnings = Self::sum_category(balances, AccountCategory::Pendapatan)
            - Self::sum_category(balances, AccountCategory::Beban);
        let total_assets = assets.total;
        let total_liabilities = liabilities.total;
        let total_equity = equity.total + retained_earnings;
        let liabilities_and_equity = total_liabilities + total_equity;

        Ok(BalanceSheetReport {
            as_of,
            assets,
            liabilities,
            equity,
            retained_earnings,
            total_assets,
            total_liabilities,
            total_equity,
            liabilities_and_equity,
            is_balanced: total_assets == liabilities_and_equity,
        })
    }

    /// Returns the last day before a period, whose balances open the period.
    ///
    /// `None` when `date_from` is the earliest representable date.
    #[must_use]
    pub fn opening_date(date_from: NaiveDate) -> Option<NaiveDate> {
        date_from.pred_opt()
    }

    /// Fails unless debit-normal balances equal credit-normal balances.
    pub fn check_identity(balances: &[AccountBalance]) -> Result<(), ReportError> {
        let left = Self::sum_category(balances, AccountCategory::Aset)
            + Self::sum_category(balances, AccountCategory::Beban);
        let right = Self::sum_category(balances, AccountCategory::Kewajiban)
            + Self::sum_category(balances, AccountCategory::Ekuitas)
            + Self::sum_category(balances, AccountCategory::Pendapatan);

        if left == right {
            Ok(())
        } else {
            Err(ReportError::LedgerIntegrity {
                left,
                right,
                difference: left - right,
            })
        }
    }

    /// Places a normal-side balance in the debit or credit column.
    fn columns(side: NormalBalance, balance: Decimal) -> (Decimal, Decimal) {
        let on_normal_side = !balance.is_sign_negative() || balance.is_zero();
        match (side, on_normal_side) {
            (NormalBalance::Debit, true) | (NormalBalance::Credit, false) => {
                (balance.abs(), Decimal::ZERO)
            }
            (NormalBalance::Debit, false) | (NormalBalance::Credit, true) => {
                (Decimal::ZERO, balance.abs())
            }
        }
    }

    fn is_reported(balance: &AccountBalance) -> bool {
        balance.is_active || !balance.balance.is_zero()
    }

    fn sum_category(balances: &[AccountBalance], category: AccountCategory) -> Decimal {
        balances
            .iter()
            .filter(|b| b.category == category)
            .map(|b| b.balance)
            .sum()
    }

    fn category_totals(balances: &[AccountBalance]) -> Vec<CategoryTotal> {
        AccountCategory::ALL
            .iter()
            .map(|&category| CategoryTotal {
                category,
                total: Self::sum_category(balances, category),
            })
            .collect()
    }
}
