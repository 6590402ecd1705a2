//! Account repository for chart of accounts database operations.

use chrono::Utc;
use koperasi_core::coa::{
    Account, AccountChanges, CoaError, CoaService, NewAccount, ParentChange, ParentInfo,
    default_chart,
};
use koperasi_core::events::{EventHook, LedgerEvent, LedgerEventKind};
use koperasi_shared::RequestContext;
use koperasi_shared::types::{AccountId, KoperasiId, TenantId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, SqlErr,
    TransactionTrait, sea_query::JoinType,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{
    coa_accounts, journal_entries, journal_lines,
    sea_orm_active_enums::AccountCategory as DbCategory,
};

/// Deepest parent chain followed when checking for cycles.
const MAX_HIERARCHY_DEPTH: usize = 64;

/// Filter options for listing accounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountFilter {
    /// Only accounts of this category.
    pub category: Option<koperasi_core::coa::AccountCategory>,
    /// Only active (`true`) or inactive (`false`) accounts.
    pub is_active: Option<bool>,
}

/// Account repository for the chart of accounts.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
    events: EventHook,
}

impl AccountRepository {
    /// Creates a new account repository.
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

    /// Creates an account in the caller's koperasi.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The code is malformed or already used in the koperasi
    /// - The parent code does not resolve to an active account
    pub async fn create(
        &self,
        ctx: RequestContext,
        input: NewAccount,
    ) -> Result<Account, CoaError> {
        let code = CoaService::normalize_code(&input.code)?;
        let code_taken = find_by_code(&self.db, ctx.tenant_id, ctx.koperasi_id, &code)
            .await?
            .is_some();

        let parent = match input.parent_code.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(parent_code) => find_by_code(&self.db, ctx.tenant_id, ctx.koperasi_id, parent_code)
                .await?
                .map(|p| parent_info(&p)),
        };

        let validated = CoaService::validate_new(input, code_taken, parent.as_ref())?;

        let now = Utc::now().into();
        let model = coa_accounts::ActiveModel {
            id: Set(AccountId::new().into_inner()),
            tenant_id: Set(ctx.tenant_id.into_inner()),
            koperasi_id: Set(ctx.koperasi_id.into_inner()),
            code: Set(validated.code.clone()),
            name: Set(validated.name),
            category: Set(validated.category.into()),
            parent_id: Set(validated.parent_id.map(AccountId::into_inner)),
            description: Set(validated.description),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| match e.sql_err() {
            // Lost a race with a concurrent create of the same code.
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                CoaError::DuplicateCode(validated.code.clone())
            }
            _ => db_error(&e),
        })?;

        let account = model_to_account(model);
        info!(
            koperasi_id = %ctx.koperasi_id,
            account_id = %account.id,
            code = %account.code,
            "Account created"
        );
        self.events.emit(&LedgerEvent::now(
            ctx.tenant_id,
            ctx.koperasi_id,
            ctx.user_id,
            LedgerEventKind::AccountCreated {
                account_id: account.id,
                code: account.code.clone(),
            },
        ));
        Ok(account)
    }

    /// Creates every account of the default chart that the koperasi does not
    /// have yet. Returns the number of accounts created.
    ///
    /// # Errors
    ///
    /// Returns the first error other than an already used code.
    pub async fn seed_default_chart(&self, ctx: RequestContext) -> Result<usize, CoaError> {
        let mut created = 0;
        for template in default_chart() {
            let input = NewAccount {
                code: template.code.to_string(),
                name: template.name.to_string(),
                category: template.category,
                parent_code: template.parent_code.map(str::to_string),
                description: None,
            };
            match self.create(ctx, input).await {
                Ok(_) => created += 1,
                Err(CoaError::DuplicateCode(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(created)
    }

    /// Lists accounts of the caller's koperasi ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        ctx: RequestContext,
        filter: AccountFilter,
    ) -> Result<Vec<Account>, CoaError> {
        let mut query = scoped(ctx.tenant_id, ctx.koperasi_id)
            .order_by_asc(coa_accounts::Column::Code);

        if let Some(category) = filter.category {
            query = query.filter(coa_accounts::Column::Category.eq(DbCategory::from(category)));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(coa_accounts::Column::IsActive.eq(is_active));
        }

        let accounts = query.all(&self.db).await.map_err(|e| db_error(&e))?;
        Ok(accounts.into_iter().map(model_to_account).collect())
    }

    /// Finds an account of the caller's koperasi.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no such account is in scope.
    pub async fn get(&self, ctx: RequestContext, id: AccountId) -> Result<Account, CoaError> {
        self.find_model(ctx, id).await.map(model_to_account)
    }

    /// Applies changes to an account.
    ///
    /// Runs in one transaction holding the account row exclusively. Posting
    /// takes a shared lock on every account it touches, so the posted-history
    /// check below cannot be overtaken by a concurrent post.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The account is not in scope
    /// - The category changes while posted lines reference the account
    /// - The new parent is missing, inactive, or would create a cycle
    pub async fn update(
        &self,
        ctx: RequestContext,
        id: AccountId,
        changes: AccountChanges,
    ) -> Result<Account, CoaError> {
        let txn = self.db.begin().await.map_err(|e| db_error(&e))?;

        let model = scoped(ctx.tenant_id, ctx.koperasi_id)
            .filter(coa_accounts::Column::Id.eq(id.into_inner()))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| db_error(&e))?
            .ok_or(CoaError::AccountNotFound(id.into_inner()))?;
        let current = model_to_account(model.clone());
        let mut active: coa_accounts::ActiveModel = model.into();

        if let Some(name) = changes.name.as_deref() {
            active.name = Set(CoaService::normalize_name(name)?);
        }
        if let Some(description) = changes.description.as_deref() {
            active.description = Set(CoaService::normalize_description(Some(description))?);
        }
        if let Some(category) = changes.category
            && category != current.category
        {
            let has_posted = has_posted_lines(&txn, id).await?;
            CoaService::check_category_change(&current, category, has_posted)?;
            active.category = Set(category.into());
        }
        match &changes.parent {
            ParentChange::Keep => {}
            ParentChange::Clear => active.parent_id = Set(None),
            ParentChange::Set(parent_code) => {
                let parent_code = parent_code.trim();
                let parent = find_by_code(&txn, ctx.tenant_id, ctx.koperasi_id, parent_code)
                    .await?
                    .map(|p| parent_info(&p));
                let parent_id = CoaService::validate_parent(parent_code, parent.as_ref())?;
                let ancestors = ancestor_chain(&txn, ctx, parent_id).await?;
                if let Some(parent) = parent.as_ref() {
                    CoaService::check_reparent(&current, parent, &ancestors)?;
                }
                active.parent_id = Set(Some(parent_id.into_inner()));
            }
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&txn).await.map_err(|e| db_error(&e))?;
        txn.commit().await.map_err(|e| db_error(&e))?;

        let account = model_to_account(updated);
        info!(koperasi_id = %ctx.koperasi_id, account_id = %account.id, "Account updated");
        self.emit_updated(ctx, &account);
        Ok(account)
    }

    /// Marks an account inactive. Accounts are never deleted.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no such account is in scope.
    pub async fn deactivate(
        &self,
        ctx: RequestContext,
        id: AccountId,
    ) -> Result<Account, CoaError> {
        let model = self.find_model(ctx, id).await?;
        if !model.is_active {
            return Ok(model_to_account(model));
        }

        let mut active: coa_accounts::ActiveModel = model.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await.map_err(|e| db_error(&e))?;

        let account = model_to_account(updated);
        info!(koperasi_id = %ctx.koperasi_id, account_id = %account.id, "Account deactivated");
        self.emit_updated(ctx, &account);
        Ok(account)
    }

    async fn find_model(
        &self,
        ctx: RequestContext,
        id: AccountId,
    ) -> Result<coa_accounts::Model, CoaError> {
        scoped(ctx.tenant_id, ctx.koperasi_id)
            .filter(coa_accounts::Column::Id.eq(id.into_inner()))
            .one(&self.db)
            .await
            .map_err(|e| db_error(&e))?
            .ok_or(CoaError::AccountNotFound(id.into_inner()))
    }

    fn emit_updated(&self, ctx: RequestContext, account: &Account) {
        self.events.emit(&LedgerEvent::now(
            ctx.tenant_id,
            ctx.koperasi_id,
            ctx.user_id,
            LedgerEventKind::AccountUpdated {
                account_id: account.id,
                code: account.code.clone(),
            },
        ));
    }
}

fn scoped(tenant_id: TenantId, koperasi_id: KoperasiId) -> sea_orm::Select<coa_accounts::Entity> {
    coa_accounts::Entity::find()
        .filter(coa_accounts::Column::TenantId.eq(tenant_id.into_inner()))
        .filter(coa_accounts::Column::KoperasiId.eq(koperasi_id.into_inner()))
}

async fn find_by_code<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    koperasi_id: KoperasiId,
    code: &str,
) -> Result<Option<coa_accounts::Model>, CoaError> {
    scoped(tenant_id, koperasi_id)
        .filter(coa_accounts::Column::Code.eq(code))
        .one(conn)
        .await
        .map_err(|e| db_error(&e))
}

/// Returns true if any line of an entry that was ever posted references the
/// account. Cancelling a posted entry does not erase that history.
async fn has_posted_lines<C: ConnectionTrait>(conn: &C, id: AccountId) -> Result<bool, CoaError> {
    let count = journal_lines::Entity::find()
        .join(
            JoinType::InnerJoin,
            journal_lines::Relation::JournalEntries.def(),
        )
        .filter(journal_lines::Column::AccountId.eq(id.into_inner()))
        .filter(journal_entries::Column::PostedAt.is_not_null())
        .count(conn)
        .await
        .map_err(|e| db_error(&e))?;
    Ok(count > 0)
}

/// Returns `id` and its ancestors, nearest first.
async fn ancestor_chain<C: ConnectionTrait>(
    conn: &C,
    ctx: RequestContext,
    id: AccountId,
) -> Result<Vec<AccountId>, CoaError> {
    let mut chain = Vec::new();
    let mut next = Some(id.into_inner());

    while let Some(current) = next {
        if chain.len() >= MAX_HIERARCHY_DEPTH || chain.contains(&AccountId::from(current)) {
            break;
        }
        chain.push(AccountId::from(current));
        next = scoped(ctx.tenant_id, ctx.koperasi_id)
            .filter(coa_accounts::Column::Id.eq(current))
            .select_only()
            .column(coa_accounts::Column::ParentId)
            .into_tuple::<Option<Uuid>>()
            .one(conn)
            .await
            .map_err(|e| db_error(&e))?
            .flatten();
    }
    Ok(chain)
}

fn parent_info(model: &coa_accounts::Model) -> ParentInfo {
    ParentInfo {
        id: AccountId::from(model.id),
        code: model.code.clone(),
        is_active: model.is_active,
    }
}

fn db_error(err: &DbErr) -> CoaError {
    CoaError::Database(err.to_string())
}

/// Converts a stored row into the domain account.
pub(crate) fn model_to_account(model: coa_accounts::Model) -> Account {
    Account {
        id: AccountId::from(model.id),
        tenant_id: TenantId::from(model.tenant_id),
        koperasi_id: KoperasiId::from(model.koperasi_id),
        code: model.code,
        name: model.name,
        category: model.category.into(),
        parent_id: model.parent_id.map(AccountId::from),
        description: model.description,
        is_active: model.is_active,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
