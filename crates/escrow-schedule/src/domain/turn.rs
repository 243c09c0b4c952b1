//! Turn calculator.
//!
//! A pure function of a schedule and an instant. Time is always supplied by
//! the caller; nothing here reads a clock.

use escrow_core::error::EscrowError;
use escrow_core::ids::AssetId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::schedule::Schedule;

/// Reasons no turn applies at the queried instant.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TurnError {
    /// The query precedes the start of turn 1.
    #[error("schedule starts at {start_time}")]
    NotStarted {
        /// Start of turn 1, in Unix seconds.
        start_time: i64,
    },

    /// The query is at or after the end of the final turn.
    #[error("schedule ended at {ended_at}")]
    Expired {
        /// Exclusive end of the final turn, in Unix seconds.
        ended_at: i64,
    },
}

impl TurnError {
    /// Lifts the calculator error into the domain error for `asset_id`.
    #[must_use]
    pub fn for_asset(self, asset_id: AssetId) -> EscrowError {
        match self {
            Self::NotStarted { start_time } => EscrowError::NotStarted {
                asset_id,
                start_time,
            },
            Self::Expired { ended_at } => EscrowError::Expired { asset_id, ended_at },
        }
    }
}

/// Computes the turn that is current at `now`.
///
/// Turn 1 begins at `start_time`; a query landing exactly on a boundary
/// belongs to the turn that begins there. Never clamps: a query at or after
/// the end of the last turn is `Expired`.
///
/// # Errors
///
/// Returns `TurnError::NotStarted` if `now < start_time` and
/// `TurnError::Expired` if the computed turn exceeds `total_turns`.
pub fn current_turn(schedule: &Schedule, now: i64) -> Result<u64, TurnError> {
    let start_time = schedule.start_time();
    if now < start_time {
        return Err(TurnError::NotStarted { start_time });
    }

    let elapsed = i128::from(now) - i128::from(start_time);
    let turn = elapsed / i128::from(schedule.turn_duration()) + 1;

    if turn > i128::from(schedule.total_turns()) {
        return Err(TurnError::Expired {
            ended_at: schedule.ends_at(),
        });
    }

    // Bounded by `total_turns` above and at least 1.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let turn = turn as u64;
    Ok(turn)
}

/// Lifecycle of a schedule as observed through [`current_turn`].
///
/// `Pending` → `Turn(1)` … `Turn(total_turns)` → `Expired`, driven only by
/// the passage of time. `Expired` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "turn", rename_all = "snake_case")]
pub enum TurnPhase {
    /// Before the first turn.
    Pending,
    /// Inside the given turn.
    Turn(u64),
    /// After the final turn.
    Expired,
}

impl TurnPhase {
    /// Phase of `schedule` at `now`.
    #[must_use]
    pub fn at(schedule: &Schedule, now: i64) -> Self {
        match current_turn(schedule, now) {
            Ok(turn) => Self::Turn(turn),
            Err(TurnError::NotStarted { .. }) => Self::Pending,
            Err(TurnError::Expired { .. }) => Self::Expired,
        }
    }
}
