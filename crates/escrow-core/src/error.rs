//! Domain error types.

use thiserror::Error;

use crate::ids::AssetId;

/// Top-level domain error type.
///
/// `NotStarted` and `Expired` are expected temporal outcomes, not faults;
/// callers surface them as distinct states.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EscrowError {
    /// The requested schedule has a non-positive turn duration or turn count.
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    /// A schedule already exists for the asset.
    #[error("asset {0} is already deposited")]
    AlreadyDeposited(AssetId),

    /// No schedule exists for the asset.
    #[error("asset {0} is not deposited")]
    NotDeposited(AssetId),

    /// The schedule has not reached its first turn yet.
    #[error("schedule for asset {asset_id} has not started; first turn opens at {start_time}")]
    NotStarted {
        /// The escrowed asset.
        asset_id: AssetId,
        /// Start of turn 1, in Unix seconds.
        start_time: i64,
    },

    /// Every turn of the schedule has elapsed.
    #[error("schedule for asset {asset_id} expired at {ended_at}")]
    Expired {
        /// The escrowed asset.
        asset_id: AssetId,
        /// Exclusive end of the final turn, in Unix seconds.
        ended_at: i64,
    },

    /// The custody collaborator refused a transfer or lookup.
    #[error("custody rejected: {0}")]
    Custody(String),

    /// A collaborator failed for reasons unrelated to the request.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
