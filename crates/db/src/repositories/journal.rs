//! Journal repository: creation, listing and status transitions.
//!
//! Create, post and cancel each run inside one database transaction. Post and
//! cancel lock the entry row and then update it with a status guard, so of
//! several concurrent transitions on one entry exactly one succeeds. Posting a
//! draft also share-locks the accounts its lines reference.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use koperasi_core::events::{EventHook, LedgerEvent, LedgerEventKind};
use koperasi_core::journal::{
    JournalAction, JournalEntry, JournalError, JournalLine, JournalService, JournalStatus,
    JournalTotals, JournalWorkflow, LineAccount, NewJournalEntry, SourceKind, SourceRef,
};
use koperasi_core::ledger::{JournalFilter, LedgerError};
use koperasi_shared::RequestContext;
use koperasi_shared::types::{
    AccountId, JournalEntryId, JournalLineId, KoperasiId, PageRequest, PageResponse, TenantId,
    UserId,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement, TransactionTrait,
    sea_query::Expr,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::{
    coa_accounts, journal_entries, journal_lines,
    sea_orm_active_enums::JournalStatus as DbStatus,
};

const NEXT_SEQUENCE_SQL: &str = r"
INSERT INTO journal_sequences (tenant_id, koperasi_id, last_value)
VALUES ($1, $2, 1)
ON CONFLICT (tenant_id, koperasi_id)
DO UPDATE SET last_value = journal_sequences.last_value + 1
RETURNING last_value
";

/// Journal repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
    events: EventHook,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            events: EventHook::noop(),
        }
    }

    /// Publishes committed changes to `events`.
    #[must_use]
    pub fn with_events(mut self, events: EventHook) -> Self {
        self.events = events;
        self
    }

    /// Records a new draft entry in the caller's koperasi.
    ///
    /// Referenced accounts are read under a shared lock so none of them can be
    /// deactivated between validation and commit.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `UnbalancedEntry` with the delta, or a
    /// database error. Nothing is written on error.
    pub async fn create(
        &self,
        ctx: RequestContext,
        input: NewJournalEntry,
    ) -> Result<JournalEntry, JournalError> {
        let txn = self.db.begin().await.map_err(|e| db_error(&e))?;

        let account_ids: HashSet<Uuid> = input
            .lines
            .iter()
            .map(|l| l.account_id.into_inner())
            .collect();
        let accounts: HashMap<AccountId, LineAccount> = coa_accounts::Entity::find()
            .filter(coa_accounts::Column::TenantId.eq(ctx.tenant_id.into_inner()))
            .filter(coa_accounts::Column::Id.is_in(account_ids))
            .lock_shared()
            .all(&txn)
            .await
            .map_err(|e| db_error(&e))?
            .into_iter()
            .map(|a| {
                let id = AccountId::from(a.id);
                (
                    id,
                    LineAccount {
                        id,
                        tenant_id: TenantId::from(a.tenant_id),
                        koperasi_id: KoperasiId::from(a.koperasi_id),
                        code: a.code,
                        is_active: a.is_active,
                    },
                )
            })
            .collect();

        let validated = JournalService::validate(input, ctx.tenant_id, ctx.koperasi_id, |id| {
            accounts.get(&id).cloned()
        })?;

        let sequence = next_sequence(&txn, ctx.tenant_id, ctx.koperasi_id)
            .await
            .map_err(|e| db_error(&e))?;
        let entry_id = JournalEntryId::new();
        let now = Utc::now().into();

        let (source_kind, source_id) = validated
            .source
            .as_ref()
            .map_or((None, None), |s| {
                (Some(s.kind.as_str().to_string()), Some(s.id.clone()))
            });

        let entry = journal_entries::ActiveModel {
            id: Set(entry_id.into_inner()),
            tenant_id: Set(ctx.tenant_id.into_inner()),
            koperasi_id: Set(ctx.koperasi_id.into_inner()),
            entry_number: Set(JournalService::entry_number(sequence)),
            entry_date: Set(validated.entry_date),
            description: Set(validated.description),
            source_kind: Set(source_kind),
            source_id: Set(source_id),
            status: Set(DbStatus::Draft),
            total_debit: Set(validated.totals.debit),
            total_credit: Set(validated.totals.credit),
            created_by: Set(ctx.user_id.into_inner()),
            created_at: Set(now),
            posted_by: Set(None),
            posted_at: Set(None),
            cancelled_by: Set(None),
            cancelled_at: Set(None),
            cancel_reason: Set(None),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| db_error(&e))?;

        let lines: Vec<journal_lines::ActiveModel> = validated
            .lines
            .into_iter()
            .map(|line| journal_lines::ActiveModel {
                id: Set(JournalLineId::new().into_inner()),
                journal_entry_id: Set(entry_id.into_inner()),
                account_id: Set(line.account_id.into_inner()),
                line_no: Set(i32::try_from(line.line_no).unwrap_or(i32::MAX)),
                debit: Set(line.debit),
                credit: Set(line.credit),
                memo: Set(line.memo),
                created_at: Set(now),
            })
            .collect();
        journal_lines::Entity::insert_many(lines)
            .exec(&txn)
            .await
            .map_err(|e| db_error(&e))?;

        let lines = load_lines(&txn, entry_id).await?;
        txn.commit().await.map_err(|e| db_error(&e))?;

        let entry = model_to_entry(entry, lines);
        info!(
            koperasi_id = %ctx.koperasi_id,
            entry_id = %entry.id,
            entry_number = %entry.entry_number,
            total = %entry.totals.debit,
            "Journal entry created"
        );
        self.events.emit(&LedgerEvent::now(
            ctx.tenant_id,
            ctx.koperasi_id,
            ctx.user_id,
            LedgerEventKind::JournalCreated {
                entry_id: entry.id,
                entry_number: entry.entry_number.clone(),
            },
        ));
        Ok(entry)
    }

    /// Fetches one entry of the caller's koperasi with its lines.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such entry is in scope.
    pub async fn get(
        &self,
        ctx: RequestContext,
        id: JournalEntryId,
    ) -> Result<JournalEntry, JournalError> {
        let entry = scoped(ctx.tenant_id, ctx.koperasi_id)
            .filter(journal_entries::Column::Id.eq(id.into_inner()))
            .one(&self.db)
            .await
            .map_err(|e| db_error(&e))?
            .ok_or(JournalError::NotFound(id.into_inner()))?;
        let lines = load_lines(&self.db, id).await?;
        Ok(model_to_entry(entry, lines))
    }

    /// Lists entries of the caller's koperasi ordered by date, then ID.
    ///
    /// Entries of every status are listed unless the filter narrows it.
    /// Lines are not loaded.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` for an inverted range, or a database error.
    pub async fn list(
        &self,
        ctx: RequestContext,
        filter: JournalFilter,
        page: PageRequest,
    ) -> Result<PageResponse<JournalEntry>, LedgerError> {
        let filter = filter.validate()?;

        let mut query = scoped(ctx.tenant_id, ctx.koperasi_id);
        if let Some(from) = filter.date_from {
            query = query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(journal_entries::Column::EntryDate.lte(to));
        }
        if let Some(status) = filter.status {
            query = query.filter(journal_entries::Column::Status.eq(DbStatus::from(status)));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let entries = query
            .order_by_asc(journal_entries::Column::EntryDate)
            .order_by_asc(journal_entries::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let data = entries
            .into_iter()
            .map(|e| model_to_entry(e, Vec::new()))
            .collect();
        Ok(PageResponse::new(data, page, total))
    }

    /// Posts a draft entry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the entry is a draft at the moment of
    /// the update, `NotFound` if it is not in scope.
    pub async fn post(
        &self,
        ctx: RequestContext,
        id: JournalEntryId,
    ) -> Result<JournalEntry, JournalError> {
        self.transition(ctx, id, |status| JournalWorkflow::post(status, ctx.user_id))
            .await
    }

    /// Cancels a draft or posted entry. Its lines are kept.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the entry is already cancelled, `NotFound` if
    /// it is not in scope.
    pub async fn cancel(
        &self,
        ctx: RequestContext,
        id: JournalEntryId,
        reason: Option<String>,
    ) -> Result<JournalEntry, JournalError> {
        self.transition(ctx, id, move |status| {
            JournalWorkflow::cancel(status, ctx.user_id, reason.clone())
        })
        .await
    }

    async fn transition<F>(
        &self,
        ctx: RequestContext,
        id: JournalEntryId,
        decide: F,
    ) -> Result<JournalEntry, JournalError>
    where
        F: Fn(JournalStatus) -> Result<JournalAction, JournalError>,
    {
        let txn = self.db.begin().await.map_err(|e| db_error(&e))?;

        let entry = scoped(ctx.tenant_id, ctx.koperasi_id)
            .filter(journal_entries::Column::Id.eq(id.into_inner()))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| db_error(&e))?
            .ok_or(JournalError::NotFound(id.into_inner()))?;

        let lines = load_lines(&txn, id).await?;
        if entry.status == DbStatus::Draft {
            // A post turns these accounts' lines into posted history; hold them
            // against a concurrent category change until commit.
            let account_ids: HashSet<Uuid> =
                lines.iter().map(|l| l.account_id.into_inner()).collect();
            coa_accounts::Entity::find()
                .filter(coa_accounts::Column::Id.is_in(account_ids))
                .order_by_asc(coa_accounts::Column::Id)
                .lock_shared()
                .all(&txn)
                .await
                .map_err(|e| db_error(&e))?;
        }

        let action = decide(entry.status.into())?;

        let mut update = journal_entries::Entity::update_many()
            .col_expr(
                journal_entries::Column::Status,
                Expr::value(DbStatus::from(action.new_status())),
            )
            .col_expr(journal_entries::Column::UpdatedAt, Expr::value(Utc::now()));

        match &action {
            JournalAction::Post {
                posted_by,
                posted_at,
                ..
            } => {
                // The stored lines are the source of truth, not the cached totals.
                let totals = JournalService::totals(lines.iter().map(|l| (l.debit, l.credit)))?;
                JournalService::ensure_balanced(totals)?;
                update = update
                    .col_expr(
                        journal_entries::Column::PostedBy,
                        Expr::value(posted_by.into_inner()),
                    )
                    .col_expr(journal_entries::Column::PostedAt, Expr::value(*posted_at));
            }
            JournalAction::Cancel {
                cancelled_by,
                cancelled_at,
                reason,
                ..
            } => {
                update = update
                    .col_expr(
                        journal_entries::Column::CancelledBy,
                        Expr::value(cancelled_by.into_inner()),
                    )
                    .col_expr(
                        journal_entries::Column::CancelledAt,
                        Expr::value(*cancelled_at),
                    )
                    .col_expr(
                        journal_entries::Column::CancelReason,
                        Expr::value(reason.clone()),
                    );
            }
        }

        let result = update
            .filter(journal_entries::Column::Id.eq(id.into_inner()))
            .filter(journal_entries::Column::Status.eq(DbStatus::from(action.expected_status())))
            .exec(&txn)
            .await
            .map_err(|e| db_error(&e))?;

        if result.rows_affected != 1 {
            warn!(entry_id = %id, "Journal status changed concurrently");
            return Err(JournalError::InvalidState {
                from: entry.status.into(),
                to: action.new_status(),
            });
        }

        let updated = journal_entries::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await
            .map_err(|e| db_error(&e))?
            .ok_or(JournalError::NotFound(id.into_inner()))?;
        txn.commit().await.map_err(|e| db_error(&e))?;

        let entry = model_to_entry(updated, lines);
        info!(
            koperasi_id = %ctx.koperasi_id,
            entry_id = %entry.id,
            status = %entry.status,
            "Journal entry status changed"
        );
        let kind = match action {
            JournalAction::Post { .. } => LedgerEventKind::JournalPosted {
                entry_id: entry.id,
                entry_number: entry.entry_number.clone(),
            },
            JournalAction::Cancel { .. } => LedgerEventKind::JournalCancelled {
                entry_id: entry.id,
                entry_number: entry.entry_number.clone(),
            },
        };
        self.events.emit(&LedgerEvent::now(
            ctx.tenant_id,
            ctx.koperasi_id,
            ctx.user_id,
            kind,
        ));
        Ok(entry)
    }
}

/// Allocates the next entry number for a koperasi.
///
/// The counter row stays locked until the surrounding transaction ends, so
/// numbers are gap-free per committed transaction order.
async fn next_sequence<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    koperasi_id: KoperasiId,
) -> Result<i64, DbErr> {
    let stmt = Statement::from_sql_and_values(
        conn.get_database_backend(),
        NEXT_SEQUENCE_SQL,
        [tenant_id.into_inner().into(), koperasi_id.into_inner().into()],
    );
    let row = conn
        .query_one(stmt)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("journal_sequences".to_string()))?;
    row.try_get("", "last_value")
}

async fn load_lines<C: ConnectionTrait>(
    conn: &C,
    entry_id: JournalEntryId,
) -> Result<Vec<JournalLine>, JournalError> {
    let lines = journal_lines::Entity::find()
        .filter(journal_lines::Column::JournalEntryId.eq(entry_id.into_inner()))
        .order_by_asc(journal_lines::Column::LineNo)
        .all(conn)
        .await
        .map_err(|e| db_error(&e))?;

    Ok(lines
        .into_iter()
        .map(|l| JournalLine {
            id: JournalLineId::from(l.id),
            line_no: u32::try_from(l.line_no).unwrap_or_default(),
            account_id: AccountId::from(l.account_id),
            debit: l.debit,
            credit: l.credit,
            memo: l.memo,
        })
        .collect())
}

fn scoped(
    tenant_id: TenantId,
    koperasi_id: KoperasiId,
) -> sea_orm::Select<journal_entries::Entity> {
    journal_entries::Entity::find()
        .filter(journal_entries::Column::TenantId.eq(tenant_id.into_inner()))
        .filter(journal_entries::Column::KoperasiId.eq(koperasi_id.into_inner()))
}

fn db_error(err: &DbErr) -> JournalError {
    JournalError::Database(err.to_string())
}

fn model_to_entry(model: journal_entries::Model, lines: Vec<JournalLine>) -> JournalEntry {
    let source = match (model.source_kind.as_deref(), model.source_id) {
        (Some(kind), Some(id)) => SourceKind::parse(kind).map(|kind| SourceRef { kind, id }),
        _ => None,
    };

    JournalEntry {
        id: JournalEntryId::from(model.id),
        tenant_id: TenantId::from(model.tenant_id),
        koperasi_id: KoperasiId::from(model.koperasi_id),
        entry_number: model.entry_number,
        entry_date: model.entry_date,
        description: model.description,
        source,
        status: model.status.into(),
        totals: JournalTotals::new(model.total_debit, model.total_credit),
        created_by: UserId::from(model.created_by),
        created_at: model.created_at.with_timezone(&Utc),
        posted_by: model.posted_by.map(UserId::from),
        posted_at: model.posted_at.map(|t| t.with_timezone(&Utc)),
        cancelled_by: model.cancelled_by.map(UserId::from),
        cancelled_at: model.cancelled_at.map(|t| t.with_timezone(&Utc)),
        cancel_reason: model.cancel_reason,
        lines,
    }
}
