//! Ledger repository: reads posted journal lines and folds them into
//! account balances.

use chrono::NaiveDate;
use koperasi_core::coa::Account;
use koperasi_core::journal::JournalStatus;
use koperasi_core::ledger::{self, AccountBalance, LedgerError, LedgerLine};
use koperasi_shared::RequestContext;
use koperasi_shared::types::AccountId;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, sea_query::JoinType,
};
use uuid::Uuid;

use super::account::model_to_account;
use crate::entities::{
    coa_accounts, journal_entries, journal_lines,
    sea_orm_active_enums::JournalStatus as DbStatus,
};

type LineRow = (Uuid, NaiveDate, DbStatus, Decimal, Decimal);

/// Ledger repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Posted lines of the caller's koperasi dated on or before `as_of`.
    ///
    /// Pass `account_id` to read a single account's lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn posted_lines(
        &self,
        ctx: RequestContext,
        as_of: NaiveDate,
        account_id: Option<AccountId>,
    ) -> Result<Vec<LedgerLine>, LedgerError> {
        let mut query = journal_lines::Entity::find()
            .select_only()
            .column(journal_lines::Column::AccountId)
            .column(journal_entries::Column::EntryDate)
            .column(journal_entries::Column::Status)
            .column(journal_lines::Column::Debit)
            .column(journal_lines::Column::Credit)
            .join(
                JoinType::InnerJoin,
                journal_lines::Relation::JournalEntries.def(),
            )
            .filter(journal_entries::Column::TenantId.eq(ctx.tenant_id.into_inner()))
            .filter(journal_entries::Column::KoperasiId.eq(ctx.koperasi_id.into_inner()))
            .filter(journal_entries::Column::Status.eq(DbStatus::Posted))
            .filter(journal_entries::Column::EntryDate.lte(as_of));

        if let Some(account_id) = account_id {
            query = query.filter(journal_lines::Column::AccountId.eq(account_id.into_inner()));
        }

        let rows: Vec<LineRow> = query
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| db_error(&e))?;

        Ok(rows
            .into_iter()
            .map(|(account_id, entry_date, status, debit, credit)| LedgerLine {
                account_id: AccountId::from(account_id),
                entry_date,
                status: JournalStatus::from(status),
                debit,
                credit,
            })
            .collect())
    }

    /// Every account of the caller's koperasi, active or not, by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn accounts(&self, ctx: RequestContext) -> Result<Vec<Account>, LedgerError> {
        let models = coa_accounts::Entity::find()
            .filter(coa_accounts::Column::TenantId.eq(ctx.tenant_id.into_inner()))
            .filter(coa_accounts::Column::KoperasiId.eq(ctx.koperasi_id.into_inner()))
            .order_by_asc(coa_accounts::Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| db_error(&e))?;
        Ok(models.into_iter().map(model_to_account).collect())
    }

    /// Balance of one account as of `as_of`.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account is not in scope.
    pub async fn account_balance(
        &self,
        ctx: RequestContext,
        account_id: AccountId,
        as_of: NaiveDate,
    ) -> Result<AccountBalance, LedgerError> {
        let account = coa_accounts::Entity::find()
            .filter(coa_accounts::Column::Id.eq(account_id.into_inner()))
            .filter(coa_accounts::Column::TenantId.eq(ctx.tenant_id.into_inner()))
            .filter(coa_accounts::Column::KoperasiId.eq(ctx.koperasi_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(|e| db_error(&e))?
            .map(model_to_account)
            .ok_or(LedgerError::AccountNotFound(account_id.into_inner()))?;

        let lines = self.posted_lines(ctx, as_of, Some(account_id)).await?;
        let totals = ledger::accumulate(lines, as_of)
            .remove(&account_id)
            .unwrap_or_default();
        Ok(AccountBalance::from_totals(&account, totals))
    }

    /// Balances of every account of the caller's koperasi as of `as_of`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn balances(
        &self,
        ctx: RequestContext,
        as_of: NaiveDate,
    ) -> Result<Vec<AccountBalance>, LedgerError> {
        let accounts = self.accounts(ctx).await?;
        let lines = self.posted_lines(ctx, as_of, None).await?;
        Ok(ledger::balances_as_of(&accounts, lines, as_of))
    }
}

fn db_error(err: &DbErr) -> LedgerError {
    LedgerError::Database(err.to_string())
}
