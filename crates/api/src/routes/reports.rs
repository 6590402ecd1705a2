//! Financial report routes.
//!
//! Omitted dates default to today in the ledger timezone. The income
//! statement period defaults to January 1 of its end year.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::NaiveDate;
use koperasi_core::ledger::AccountBalance;
use koperasi_core::reports::{BalanceSheetReport, IncomeStatementReport, TrialBalanceReport};
use koperasi_db::repositories::{LedgerRepository, ReportRepository};
use koperasi_shared::types::{AccountId, KoperasiId};
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    error::ApiError,
    middleware::AuthUser,
    routes::params::{ScopeQuery, date_or, start_of_year},
};

/// Creates the report routes (auth middleware is applied by the caller).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/{koperasi_id}/neraca-saldo", get(get_trial_balance))
        .route("/{koperasi_id}/laba-rugi", get(get_income_statement))
        .route("/{koperasi_id}/neraca", get(get_balance_sheet))
        .route("/akun/{akun_id}/saldo", get(get_account_balance))
}

/// Query parameters for point-in-time reports.
#[derive(Debug, Deserialize)]
pub struct AsOfQuery {
    /// As-of date, `YYYY-MM-DD`.
    pub tanggal: Option<String>,
}

/// Query parameters for the income statement.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// Period start, inclusive.
    pub dari: Option<String>,
    /// Period end, inclusive.
    pub sampai: Option<String>,
}

/// Response for a single account balance.
#[derive(Debug, Serialize)]
pub struct AccountBalanceResponse {
    /// As-of date.
    pub tanggal: NaiveDate,
    /// The balance.
    #[serde(flatten)]
    pub balance: AccountBalance,
}

/// GET `/financial/{koperasi_id}/neraca-saldo` - Trial balance.
async fn get_trial_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(koperasi_id): Path<KoperasiId>,
    Query(query): Query<AsOfQuery>,
) -> Result<Json<TrialBalanceReport>, ApiError> {
    let ctx = auth.scoped(koperasi_id)?;
    let as_of = date_or("tanggal", query.tanggal.as_deref(), state.today())?;

    let report = ReportRepository::new((*state.db).clone())
        .trial_balance(ctx, as_of)
        .await?;
    Ok(Json(report))
}

/// GET `/financial/{koperasi_id}/laba-rugi` - Income statement for a period.
async fn get_income_statement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(koperasi_id): Path<KoperasiId>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<IncomeStatementReport>, ApiError> {
    let ctx = auth.scoped(koperasi_id)?;
    let date_to = date_or("sampai", query.sampai.as_deref(), state.today())?;
    let date_from = date_or("dari", query.dari.as_deref(), start_of_year(date_to))?;

    let report = ReportRepository::new((*state.db).clone())
        .income_statement(ctx, date_from, date_to)
        .await?;
    Ok(Json(report))
}

/// GET `/financial/{koperasi_id}/neraca` - Balance sheet.
async fn get_balance_sheet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(koperasi_id): Path<KoperasiId>,
    Query(query): Query<AsOfQuery>,
) -> Result<Json<BalanceSheetReport>, ApiError> {
    let ctx = auth.scoped(koperasi_id)?;
    let as_of = date_or("tanggal", query.tanggal.as_deref(), state.today())?;

    let report = ReportRepository::new((*state.db).clone())
        .balance_sheet(ctx, as_of)
        .await?;
    Ok(Json(report))
}

/// GET `/financial/akun/{akun_id}/saldo` - Balance of one account.
async fn get_account_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(akun_id): Path<AccountId>,
    Query(scope): Query<ScopeQuery>,
    Query(query): Query<AsOfQuery>,
) -> Result<Json<AccountBalanceResponse>, ApiError> {
    let ctx = auth.scoped_opt(scope.koperasi_id)?;
    let as_of = date_or("tanggal", query.tanggal.as_deref(), state.today())?;

    let balance = LedgerRepository::new((*state.db).clone())
        .account_balance(ctx, akun_id, as_of)
        .await?;
    Ok(Json(AccountBalanceResponse {
        tanggal: as_of,
        balance,
    }))
}
