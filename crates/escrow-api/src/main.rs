//! Auction escrow API server entry point.

use std::sync::Arc;

use escrow_api::config::ServerConfig;
use escrow_api::error::AppError;
use escrow_api::routes;
use escrow_api::state::AppState;
use escrow_core::clock::SystemClock;
use escrow_store::{InMemoryScheduleStore, InMemoryTokenLedger};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting auction escrow API server");

    let config = ServerConfig::from_env()?;

    // Build application state.
    let ledger = Arc::new(InMemoryTokenLedger::new(config.escrow_account));
    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(InMemoryScheduleStore::new()),
        ledger,
    );

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = config.socket_addr()?;
    tracing::info!(%addr, escrow_account = %config.escrow_account, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
