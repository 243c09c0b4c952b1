//! Routes for the reference token ledger.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{
    Json, Router,
    routing::{get, post},
};
use escrow_core::custody::CustodyService;
use escrow_core::ids::{AccountId, AssetId};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /mint and POST /{asset_id}/approve.
#[derive(Debug, Deserialize)]
pub struct OwnerRequest {
    /// The account acting as owner.
    pub owner: AccountId,
}

/// Ownership of a token.
#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    /// The token.
    pub asset_id: AssetId,
    /// Current owner, `None` for a token that was never minted.
    pub owner: Option<AccountId>,
}

/// Approval state of a token.
#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    /// The token.
    pub asset_id: AssetId,
    /// Account approved to move the token.
    pub approved: AccountId,
}

/// POST /mint
#[instrument(skip_all, fields(owner = %request.owner))]
async fn mint(
    State(state): State<AppState>,
    Json(request): Json<OwnerRequest>,
) -> (StatusCode, Json<OwnerResponse>) {
    let asset_id = state.ledger.mint(request.owner);
    (
        StatusCode::CREATED,
        Json(OwnerResponse {
            asset_id,
            owner: Some(request.owner),
        }),
    )
}

/// POST /{asset_id}/approve
#[instrument(skip_all, fields(asset_id = %asset_id, owner = %request.owner))]
async fn approve(
    State(state): State<AppState>,
    Path(asset_id): Path<AssetId>,
    Json(request): Json<OwnerRequest>,
) -> Result<Json<ApprovalResponse>, ApiError> {
    state.ledger.approve(asset_id, request.owner)?;
    info!("escrow approved to move token");

    Ok(Json(ApprovalResponse {
        asset_id,
        approved: state.ledger.escrow_account(),
    }))
}

/// GET /{asset_id}/owner
async fn owner_of(
    State(state): State<AppState>,
    Path(asset_id): Path<AssetId>,
) -> Result<Json<OwnerResponse>, ApiError> {
    let owner = state.ledger.owner_of(asset_id).await?;
    Ok(Json(OwnerResponse { asset_id, owner }))
}

/// Returns the router for the token ledger.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mint", post(mint))
        .route("/{asset_id}/approve", post(approve))
        .route("/{asset_id}/owner", get(owner_of))
}
