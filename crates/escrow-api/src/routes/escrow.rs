//! Routes for escrow deposits, turn queries and releases.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{
    Json, Router,
    routing::{get, post},
};
use escrow_core::ids::{AccountId, AssetId};
use escrow_schedule::application::command_handlers::{self, EscrowCommandResult};
use escrow_schedule::application::query_handlers::{self, ScheduleView, TurnView};
use escrow_schedule::domain::commands;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /deposits.
#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    /// The asset to escrow.
    pub asset_id: AssetId,
    /// Current owner handing the asset over.
    pub depositor: AccountId,
    /// Start of turn 1, in Unix seconds.
    pub start_time: i64,
    /// Seconds per turn.
    pub turn_duration: i64,
    /// Number of turns.
    pub turn_count: i64,
}

/// Request body for POST /deposits/{asset_id}/release.
#[derive(Debug, Deserialize)]
pub struct ReleaseRequest {
    /// Account receiving the asset.
    pub recipient: AccountId,
}

/// Response body returned after a command is successfully handled.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// The asset affected by the command.
    pub asset_id: AssetId,
    /// IDs of the domain events produced.
    pub event_ids: Vec<Uuid>,
}

impl From<EscrowCommandResult> for CommandResponse {
    fn from(result: EscrowCommandResult) -> Self {
        Self {
            asset_id: result.asset_id,
            event_ids: result
                .events
                .iter()
                .map(|e| e.metadata.event_id)
                .collect(),
        }
    }
}

/// POST /deposits
#[instrument(skip(state, request), fields(asset_id = %request.asset_id))]
async fn deposit(
    State(state): State<AppState>,
    Json(request): Json<DepositRequest>,
) -> Result<(StatusCode, Json<CommandResponse>), ApiError> {
    let command = commands::DepositToken {
        correlation_id: Uuid::new_v4(),
        asset_id: request.asset_id,
        depositor: request.depositor,
        start_time: request.start_time,
        turn_duration: request.turn_duration,
        turn_count: request.turn_count,
    };

    info!(correlation_id = %command.correlation_id, "handling deposit_token command");

    let result = command_handlers::handle_deposit(
        &command,
        state.clock.as_ref(),
        state.schedules.as_ref(),
        state.custody.as_ref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(result.into())))
}

/// POST /deposits/{asset_id}/release
#[instrument(skip_all, fields(asset_id = %asset_id))]
async fn release(
    State(state): State<AppState>,
    Path(asset_id): Path<AssetId>,
    Json(request): Json<ReleaseRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::ReleaseToken {
        correlation_id: Uuid::new_v4(),
        asset_id,
        recipient: request.recipient,
    };

    info!(correlation_id = %command.correlation_id, "handling release_token command");

    let result = command_handlers::handle_release(
        &command,
        state.clock.as_ref(),
        state.schedules.as_ref(),
        state.custody.as_ref(),
    )
    .await?;

    Ok(Json(result.into()))
}

/// GET /deposits/{asset_id}/turn
#[instrument(skip_all, fields(asset_id = %asset_id))]
async fn get_turn(
    State(state): State<AppState>,
    Path(asset_id): Path<AssetId>,
) -> Result<Json<TurnView>, ApiError> {
    let view = query_handlers::get_turn(asset_id, state.clock.as_ref(), state.schedules.as_ref())?;
    Ok(Json(view))
}

/// GET /deposits/{asset_id}
#[instrument(skip_all, fields(asset_id = %asset_id))]
async fn get_schedule(
    State(state): State<AppState>,
    Path(asset_id): Path<AssetId>,
) -> Result<Json<ScheduleView>, ApiError> {
    let view =
        query_handlers::get_schedule(asset_id, state.clock.as_ref(), state.schedules.as_ref())?;
    Ok(Json(view))
}

/// GET /deposits
async fn list_schedules(State(state): State<AppState>) -> Json<Vec<ScheduleView>> {
    Json(query_handlers::list_schedules(
        state.clock.as_ref(),
        state.schedules.as_ref(),
    ))
}

/// Returns the router for the escrow context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/deposits", post(deposit).get(list_schedules))
        .route("/deposits/{asset_id}", get(get_schedule))
        .route("/deposits/{asset_id}/turn", get(get_turn))
        .route("/deposits/{asset_id}/release", post(release))
}
