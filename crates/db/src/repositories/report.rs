//! Report repository: financial statements derived from ledger balances.

use chrono::NaiveDate;
use koperasi_core::ledger::{self, AccountBalance};
use koperasi_core::reports::{
    BalanceSheetReport, IncomeStatementReport, ReportError, ReportService, TrialBalanceReport,
};
use koperasi_shared::RequestContext;
use sea_orm::DatabaseConnection;
use tracing::error;

use super::ledger::LedgerRepository;

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    ledger: LedgerRepository,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            ledger: LedgerRepository::new(db),
        }
    }

    /// Trial balance (neraca saldo) as of a date.
    ///
    /// # Errors
    ///
    /// Returns `LedgerIntegrity` if the stored ledger does not balance.
    pub async fn trial_balance(
        &self,
        ctx: RequestContext,
        as_of: NaiveDate,
    ) -> Result<TrialBalanceReport, ReportError> {
        let balances = self.ledger.balances(ctx, as_of).await?;
        ReportService::trial_balance(as_of, &balances).inspect_err(|e| log_integrity(ctx, e))
    }

    /// Income statement (laba rugi) for an inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `date_from > date_to`.
    pub async fn income_statement(
        &self,
        ctx: RequestContext,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<IncomeStatementReport, ReportError> {
        if date_from > date_to {
            return Err(ReportError::InvalidDateRange {
                from: date_from,
                to: date_to,
            });
        }

        // One read serves both ends of the period.
        let accounts = self.ledger.accounts(ctx).await?;
        let lines = self.ledger.posted_lines(ctx, date_to, None).await?;

        let closing = ledger::balances_as_of(&accounts, lines.iter().copied(), date_to);
        let opening: Vec<AccountBalance> = match ReportService::opening_date(date_from) {
            Some(opening_date) => ledger::balances_as_of(&accounts, lines, opening_date),
            None => ledger::balances_as_of(&accounts, Vec::new(), date_from),
        };

        ReportService::income_statement(date_from, date_to, &opening, &closing)
    }

    /// Balance sheet (neraca) as of a date.
    ///
    /// # Errors
    ///
    /// Returns `LedgerIntegrity` if the stored ledger does not balance.
    pub async fn balance_sheet(
        &self,
        ctx: RequestContext,
        as_of: NaiveDate,
    ) -> Result<BalanceSheetReport, ReportError> {
        let balances = self.ledger.balances(ctx, as_of).await?;
        ReportService::balance_sheet(as_of, &balances).inspect_err(|e| log_integrity(ctx, e))
    }
}

fn log_integrity(ctx: RequestContext, err: &ReportError) {
    if let ReportError::LedgerIntegrity {
        left,
        right,
        difference,
    } = err
    {
        error!(
            tenant_id = %ctx.tenant_id,
            koperasi_id = %ctx.koperasi_id,
            %left,
            %right,
            %difference,
            "Ledger integrity violation"
        );
    }
}
