//! Liveness endpoint reporting the escrow account and how many assets it holds.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use escrow_core::ids::AccountId;
use serde::Serialize;

use crate::state::AppState;

/// Liveness report.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the server answers.
    pub status: &'static str,
    /// Crate version of the running server.
    pub version: &'static str,
    /// Account the ledger treats as escrow.
    pub escrow_account: AccountId,
    /// Number of assets currently under a schedule.
    pub deposits: usize,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        escrow_account: state.ledger.escrow_account(),
        deposits: state.schedules.list().len(),
    })
}

/// Returns the liveness router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
