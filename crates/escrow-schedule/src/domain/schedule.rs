//! The escrow schedule of a deposited asset.

use escrow_core::error::EscrowError;
use escrow_core::ids::AssetId;
use serde::Serialize;

use super::turn::{self, TurnPhase};

/// Immutable schedule governing an active deposit.
///
/// Turn `k` occupies the half-open window
/// `[start_time + (k - 1) * turn_duration, start_time + k * turn_duration)`
/// for `k` in `1..=total_turns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Schedule {
    asset_id: AssetId,
    start_time: i64,
    turn_duration: u64,
    total_turns: u64,
}

impl Schedule {
    /// Builds a schedule, rejecting non-positive durations and turn counts.
    ///
    /// `start_time` may lie in the past.
    ///
    /// # Errors
    ///
    /// Returns `EscrowError::InvalidSchedule` if `turn_duration <= 0` or
    /// `turn_count <= 0`.
    pub fn new(
        asset_id: AssetId,
        start_time: i64,
        turn_duration: i64,
        turn_count: i64,
    ) -> Result<Self, EscrowError> {
        if turn_duration <= 0 {
            return Err(EscrowError::InvalidSchedule(format!(
                "turn duration must be positive, got {turn_duration}"
            )));
        }
        if turn_count <= 0 {
            return Err(EscrowError::InvalidSchedule(format!(
                "turn count must be positive, got {turn_count}"
            )));
        }

        Ok(Self {
            asset_id,
            start_time,
            turn_duration: turn_duration.unsigned_abs(),
            total_turns: turn_count.unsigned_abs(),
        })
    }

    /// The escrowed asset.
    #[must_use]
    pub fn asset_id(&self) -> AssetId {
        self.asset_id
    }

    /// Start of turn 1, in Unix seconds.
    #[must_use]
    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    /// Length of every turn, in seconds.
    #[must_use]
    pub fn turn_duration(&self) -> u64 {
        self.turn_duration
    }

    /// Highest reachable turn number.
    #[must_use]
    pub fn total_turns(&self) -> u64 {
        self.total_turns
    }

    /// Exclusive end of the final turn, in Unix seconds.
    ///
    /// Saturates at `i64::MAX` for schedules that outlast the timestamp range.
    #[must_use]
    pub fn ends_at(&self) -> i64 {
        let end = i128::from(self.start_time)
            + i128::from(self.total_turns) * i128::from(self.turn_duration);
        saturate(end)
    }

    /// Half-open window `[opens, closes)` of turn `turn`, or `None` when the
    /// turn number is outside `1..=total_turns`.
    #[must_use]
    pub fn turn_window(&self, turn: u64) -> Option<(i64, i64)> {
        if turn == 0 || turn > self.total_turns {
            return None;
        }
        let duration = i128::from(self.turn_duration);
        let opens = i128::from(self.start_time) + i128::from(turn - 1) * duration;
        Some((saturate(opens), saturate(opens + duration)))
    }

    /// Current turn at `now`, with failures tagged by this schedule's asset.
    ///
    /// # Errors
    ///
    /// Returns `EscrowError::NotStarted` before `start_time` and
    /// `EscrowError::Expired` at or after [`Schedule::ends_at`].
    pub fn turn_at(&self, now: i64) -> Result<u64, EscrowError> {
        turn::current_turn(self, now).map_err(|err| err.for_asset(self.asset_id))
    }

    /// Where in its lifecycle the schedule is at `now`.
    #[must_use]
    pub fn phase(&self, now: i64) -> TurnPhase {
        TurnPhase::at(self, now)
    }
}

fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}
