//! Route modules and the assembled application router.

pub mod escrow;
pub mod health;
pub mod tokens;

use axum::Router;

use crate::state::AppState;

/// Returns the full route tree, shared by the server binary and integration
/// tests.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/escrow", escrow::router())
        .nest("/api/v1/tokens", tokens::router())
}
