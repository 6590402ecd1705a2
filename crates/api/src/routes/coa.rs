//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use koperasi_core::coa::{
    Account, AccountCategory, AccountChanges, CategoryInfo, NewAccount, NormalBalance,
    ParentChange, kategori_list,
};
use koperasi_db::repositories::{AccountFilter, AccountRepository};
use koperasi_shared::types::{AccountId, KoperasiId};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::{
    AppState, error::ApiError, extract::ApiJson, middleware::AuthUser, routes::params::ScopeQuery,
};

/// Creates the chart of accounts routes (auth middleware is applied by the caller).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/coa/kategori", get(list_categories))
        .route("/coa/akun", post(create_account))
        .route(
            "/coa/akun/{akun_id}",
            get(get_account).put(update_account).delete(deactivate_account),
        )
        .route("/{koperasi_id}/coa/akun", get(list_accounts))
}

/// Request body for creating an account.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccountRequest {
    /// Target koperasi; defaults to the caller's own.
    pub koperasi_id: Option<KoperasiId>,
    /// Account code, e.g. `1-1000`.
    #[validate(length(min = 1, max = 20))]
    pub code: String,
    /// Account name.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Category in Indonesian or English.
    #[serde(alias = "kategori")]
    pub category: String,
    /// Code of the parent account.
    pub parent_code: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
}

/// Request body for updating an account. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    /// New name.
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    /// New category.
    #[serde(alias = "kategori")]
    pub category: Option<String>,
    /// New parent code; an empty string detaches the account.
    pub parent_code: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// Activate or deactivate.
    pub is_active: Option<bool>,
}

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    /// Filter by category.
    pub kategori: Option<String>,
    /// Filter by active flag.
    pub aktif: Option<bool>,
}

/// Response for an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: AccountId,
    /// Owning koperasi.
    pub koperasi_id: KoperasiId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Category.
    pub category: AccountCategory,
    /// Normal balance side.
    pub normal_balance: NormalBalance,
    /// Parent account.
    pub parent_id: Option<AccountId>,
    /// Description.
    pub description: Option<String>,
    /// Whether the account accepts new lines.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last change.
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            normal_balance: account.normal_balance(),
            id: account.id,
            koperasi_id: account.koperasi_id,
            code: account.code,
            name: account.name,
            category: account.category,
            parent_id: account.parent_id,
            description: account.description,
            is_active: account.is_active,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

fn repository(state: &AppState) -> AccountRepository {
    AccountRepository::new((*state.db).clone()).with_events(state.events.clone())
}

/// GET `/financial/coa/kategori` - The five account categories.
async fn list_categories(_auth: AuthUser) -> Json<Vec<CategoryInfo>> {
    Json(kategori_list())
}

/// POST `/financial/coa/akun` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<CreateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ctx = auth.scoped_opt(body.koperasi_id)?;
    ctx.require_account_manager()?;
    body.validate()?;

    let category: AccountCategory = body.category.parse()?;
    let account = repository(&state)
        .create(
            ctx,
            NewAccount {
                code: body.code,
                name: body.name,
                category,
                parent_code: body.parent_code,
                description: body.description,
            },
        )
        .await?;

    info!(
        koperasi_id = %ctx.koperasi_id,
        account_id = %account.id,
        user_id = %ctx.user_id,
        "Account created via API"
    );
    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

/// GET `/financial/{koperasi_id}/coa/akun` - List accounts ordered by code.
async fn list_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(koperasi_id): Path<KoperasiId>,
    Query(query): Query<ListAccountsQuery>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let ctx = auth.scoped(koperasi_id)?;

    let category = match query.kategori.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<AccountCategory>()?),
    };
    let filter = AccountFilter {
        category,
        is_active: query.aktif,
    };

    let accounts = repository(&state).list(ctx, filter).await?;
    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}

/// GET `/financial/coa/akun/{akun_id}` - Get one account.
async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(akun_id): Path<AccountId>,
    Query(scope): Query<ScopeQuery>,
) -> Result<Json<AccountResponse>, ApiError> {
    let ctx = auth.scoped_opt(scope.koperasi_id)?;
    let account = repository(&state).get(ctx, akun_id).await?;
    Ok(Json(account.into()))
}

/// PUT `/financial/coa/akun/{akun_id}` - Update an account.
async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(akun_id): Path<AccountId>,
    Query(scope): Query<ScopeQuery>,
    ApiJson(body): ApiJson<UpdateAccountRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let ctx = auth.scoped_opt(scope.koperasi_id)?;
    ctx.require_account_manager()?;
    body.validate()?;

    let category = body
        .category
        .as_deref()
        .map(str::parse::<AccountCategory>)
        .transpose()?;
    let parent = match body.parent_code {
        None => ParentChange::Keep,
        Some(code) if code.trim().is_empty() => ParentChange::Clear,
        Some(code) => ParentChange::Set(code),
    };

    let account = repository(&state)
        .update(
            ctx,
            akun_id,
            AccountChanges {
                name: body.name,
                category,
                parent,
                description: body.description,
                is_active: body.is_active,
            },
        )
        .await?;
    Ok(Json(account.into()))
}

/// DELETE `/financial/coa/akun/{akun_id}` - Soft-deactivate an account.
async fn deactivate_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(akun_id): Path<AccountId>,
    Query(scope): Query<ScopeQuery>,
) -> Result<Json<AccountResponse>, ApiError> {
    let ctx = auth.scoped_opt(scope.koperasi_id)?;
    ctx.require_account_manager()?;

    let account = repository(&state).deactivate(ctx, akun_id).await?;
    Ok(Json(account.into()))
}
