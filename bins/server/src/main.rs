//! Koperasi ledger API server.
//!
//! Main entry point for the ledger backend service.

use std::sync::Arc;

use anyhow::Context;
use koperasi_api::{AppState, create_router, events::TracingEventSink};
use koperasi_core::events::EventHook;
use koperasi_db::connect_pooled;
use koperasi_shared::config::{LogConfig, LogFormat};
use koperasi_shared::{AppConfig, JwtConfig, JwtService};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| log.filter.clone().into());
    let registry = tracing_subscriber::registry().with(filter);

    match log.format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.log);

    let timezone = config
        .ledger
        .tz()
        .map_err(anyhow::Error::msg)
        .context("Invalid ledger timezone")?;

    let db = connect_pooled(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await
    .context("Failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        events: EventHook::new(Arc::new(TracingEventSink)),
        timezone,
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, %timezone, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
