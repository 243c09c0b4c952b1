//! Query handlers for the escrow context.
//!
//! Queries read the clock once, fetch schedules from the store and evaluate
//! them with the pure turn calculator. They never mutate state.

use escrow_core::clock::Clock;
use escrow_core::error::EscrowError;
use escrow_core::ids::AssetId;
use serde::Serialize;

use crate::domain::schedule::Schedule;
use crate::domain::store::ScheduleStore;
use crate::domain::turn::TurnPhase;

/// The turn that is current for a deposited asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnView {
    /// The escrowed asset.
    pub asset_id: AssetId,
    /// Current turn, in `1..=total_turns`.
    pub turn: u64,
    /// Highest reachable turn.
    pub total_turns: u64,
    /// Instant the turn was evaluated at, in Unix seconds.
    pub queried_at: i64,
}

/// Read-only view of a deposited asset's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleView {
    /// The escrowed asset.
    pub asset_id: AssetId,
    /// Start of turn 1, in Unix seconds.
    pub start_time: i64,
    /// Seconds per turn.
    pub turn_duration: u64,
    /// Number of turns.
    pub total_turns: u64,
    /// Exclusive end of the final turn, in Unix seconds.
    pub ends_at: i64,
    /// Lifecycle phase at `queried_at`.
    pub phase: TurnPhase,
    /// Instant the phase was evaluated at, in Unix seconds.
    pub queried_at: i64,
}

impl ScheduleView {
    fn of(schedule: &Schedule, now: i64) -> Self {
        Self {
            asset_id: schedule.asset_id(),
            start_time: schedule.start_time(),
            turn_duration: schedule.turn_duration(),
            total_turns: schedule.total_turns(),
            ends_at: schedule.ends_at(),
            phase: schedule.phase(now),
            queried_at: now,
        }
    }
}

/// Returns the current turn of a deposited asset.
///
/// # Errors
///
/// Returns `EscrowError::NotDeposited` if the asset has no schedule,
/// `EscrowError::NotStarted` before the first turn, and
/// `EscrowError::Expired` once the last turn has ended.
pub fn get_turn(
    asset_id: AssetId,
    clock: &dyn Clock,
    store: &dyn ScheduleStore,
) -> Result<TurnView, EscrowError> {
    let schedule = store
        .get(asset_id)
        .ok_or(EscrowError::NotDeposited(asset_id))?;
    let now = clock.unix_seconds();
    let turn = schedule.turn_at(now)?;

    Ok(TurnView {
        asset_id,
        turn,
        total_turns: schedule.total_turns(),
        queried_at: now,
    })
}

/// Returns the schedule of a deposited asset together with its phase.
///
/// # Errors
///
/// Returns `EscrowError::NotDeposited` if the asset has no schedule.
pub fn get_schedule(
    asset_id: AssetId,
    clock: &dyn Clock,
    store: &dyn ScheduleStore,
) -> Result<ScheduleView, EscrowError> {
    let schedule = store
        .get(asset_id)
        .ok_or(EscrowError::NotDeposited(asset_id))?;
    Ok(ScheduleView::of(&schedule, clock.unix_seconds()))
}

/// Returns every deposited schedule, ordered by asset id, evaluated at a
/// single instant.
pub fn list_schedules(clock: &dyn Clock, store: &dyn ScheduleStore) -> Vec<ScheduleView> {
    let now = clock.unix_seconds();
    store
        .list()
        .iter()
        .map(|schedule| ScheduleView::of(schedule, now))
        .collect()
}
