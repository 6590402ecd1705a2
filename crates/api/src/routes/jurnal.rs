//! Journal entry (jurnal umum) routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use koperasi_core::journal::{
    JournalEntry, JournalLineInput, JournalStatus, NewJournalEntry, SourceKind, SourceRef,
};
use koperasi_core::ledger::JournalFilter;
use koperasi_db::repositories::JournalRepository;
use koperasi_shared::types::{AccountId, JournalEntryId, KoperasiId, PageRequest, PageResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::{
    AppState,
    error::ApiError,
    extract::ApiJson,
    middleware::AuthUser,
    routes::params::{DATE_FORMAT, ScopeQuery, parse_date},
};

/// Creates the journal routes (auth middleware is applied by the caller).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/jurnal", post(create_entry))
        .route("/jurnal/{id}", get(get_entry))
        .route("/jurnal/{id}/post", put(post_entry))
        .route("/jurnal/{id}/cancel", put(cancel_entry))
        .route("/{koperasi_id}/jurnal", get(list_entries))
}

/// One line of a new entry.
#[derive(Debug, Deserialize, Validate)]
pub struct JournalLineRequest {
    /// Account to post against.
    #[serde(alias = "akun_id")]
    pub account_id: AccountId,
    /// Debit amount; omit or zero on a credit line.
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount; omit or zero on a debit line.
    #[serde(default, alias = "kredit")]
    pub credit: Decimal,
    /// Line memo.
    #[validate(length(max = 255))]
    pub memo: Option<String>,
}

/// Source document reference.
#[derive(Debug, Deserialize)]
pub struct SourceRequest {
    /// Document kind, e.g. `simpanan`.
    pub kind: String,
    /// Document identifier.
    pub id: String,
}

/// Request body for creating an entry.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateJournalRequest {
    /// Target koperasi; defaults to the caller's own.
    pub koperasi_id: Option<KoperasiId>,
    /// Transaction date, `YYYY-MM-DD`.
    #[serde(alias = "tanggal")]
    pub date: String,
    /// Description.
    #[serde(alias = "deskripsi")]
    pub description: String,
    /// Source document reference.
    #[serde(alias = "sumber")]
    pub source_ref: Option<SourceRequest>,
    /// Lines.
    #[validate(nested)]
    pub lines: Vec<JournalLineRequest>,
}

/// Request body for cancelling an entry.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CancelJournalRequest {
    /// Why the entry is cancelled.
    #[serde(alias = "alasan")]
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Query parameters for listing entries.
#[derive(Debug, Deserialize)]
pub struct ListJournalQuery {
    /// Earliest date, inclusive.
    pub dari: Option<String>,
    /// Latest date, inclusive.
    pub sampai: Option<String>,
    /// Only entries in this status.
    pub status: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<i64>,
    /// Page size.
    pub limit: Option<i64>,
}

fn repository(state: &AppState) -> JournalRepository {
    JournalRepository::new((*state.db).clone()).with_events(state.events.clone())
}

fn into_new_entry(body: CreateJournalRequest) -> Result<NewJournalEntry, ApiError> {
    let entry_date = parse_date("date", Some(&body.date))?.ok_or_else(|| {
        ApiError::validation(format!("parameter 'date' is required ({DATE_FORMAT})"))
    })?;

    let source = body
        .source_ref
        .map(|s| {
            SourceKind::parse(s.kind.trim())
                .map(|kind| SourceRef { kind, id: s.id })
                .ok_or_else(|| {
                    ApiError::validation(format!("unknown source kind '{}'", s.kind))
                })
        })
        .transpose()?;

    let lines = body
        .lines
        .into_iter()
        .map(|l| JournalLineInput {
            account_id: l.account_id,
            debit: l.debit,
            credit: l.credit,
            memo: l.memo,
        })
        .collect();

    Ok(NewJournalEntry {
        entry_date,
        description: body.description,
        lines,
        source,
    })
}

/// POST `/financial/jurnal` - Record a draft entry.
async fn create_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<CreateJournalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ctx = auth.scoped_opt(body.koperasi_id)?;
    ctx.require_journal_writer()?;
    body.validate()?;

    let entry = repository(&state).create(ctx, into_new_entry(body)?).await?;

    info!(
        koperasi_id = %ctx.koperasi_id,
        entry_id = %entry.id,
        user_id = %ctx.user_id,
        "Journal entry recorded via API"
    );
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET `/financial/{koperasi_id}/jurnal` - Paginated listing, all statuses.
async fn list_entries(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(koperasi_id): Path<KoperasiId>,
    Query(query): Query<ListJournalQuery>,
) -> Result<Json<PageResponse<JournalEntry>>, ApiError> {
    let ctx = auth.scoped(koperasi_id)?;

    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            JournalStatus::parse(raw)
                .ok_or_else(|| ApiError::validation(format!("unknown status '{raw}'")))?,
        ),
    };
    let filter = JournalFilter {
        date_from: parse_date("dari", query.dari.as_deref())?,
        date_to: parse_date("sampai", query.sampai.as_deref())?,
        status,
    };
    let page = PageRequest::normalized(query.page, query.limit);

    let entries = repository(&state).list(ctx, filter, page).await?;
    Ok(Json(entries))
}

/// GET `/financial/jurnal/{id}` - One entry with its lines.
async fn get_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<JournalEntryId>,
    Query(scope): Query<ScopeQuery>,
) -> Result<Json<JournalEntry>, ApiError> {
    let ctx = auth.scoped_opt(scope.koperasi_id)?;
    let entry = repository(&state).get(ctx, id).await?;
    Ok(Json(entry))
}

/// PUT `/financial/jurnal/{id}/post` - Draft to posted.
async fn post_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<JournalEntryId>,
    Query(scope): Query<ScopeQuery>,
) -> Result<Json<JournalEntry>, ApiError> {
    let ctx = auth.scoped_opt(scope.koperasi_id)?;
    ctx.require_journal_poster()?;

    let entry = repository(&state).post(ctx, id).await?;
    Ok(Json(entry))
}

/// PUT `/financial/jurnal/{id}/cancel` - Draft or posted to cancelled.
async fn cancel_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<JournalEntryId>,
    Query(scope): Query<ScopeQuery>,
    body: Option<ApiJson<CancelJournalRequest>>,
) -> Result<Json<JournalEntry>, ApiError> {
    let ctx = auth.scoped_opt(scope.koperasi_id)?;
    ctx.require_journal_poster()?;

    let body = body.map(|ApiJson(b)| b).unwrap_or_default();
    body.validate()?;

    let entry = repository(&state).cancel(ctx, id, body.reason).await?;
    Ok(Json(entry))
}
