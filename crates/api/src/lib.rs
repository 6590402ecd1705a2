//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST routes for the chart of accounts, journal and reports
//! - Authentication middleware and the caller extractor
//! - JSON error responses
//! - A `tracing`-backed ledger event sink

pub mod error;
pub mod extract;
pub mod events;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use chrono::NaiveDate;
use chrono_tz::Tz;
use koperasi_core::events::EventHook;
use koperasi_shared::JwtService;
use koperasi_shared::config::today_in;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
    /// Receiver of committed ledger changes.
    pub events: EventHook,
    /// Timezone that decides which calendar day "today" is.
    pub timezone: Tz,
}

impl AppState {
    /// Today's date in the ledger timezone.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        today_in(self.timezone)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
