//! Schedule store abstraction.

use escrow_core::error::EscrowError;
use escrow_core::ids::AssetId;

use super::schedule::Schedule;

/// Keyed store of the schedules of currently deposited assets.
///
/// A schedule is present exactly while its asset is in escrow. Implementations
/// serialize `create` and `remove` per asset and publish whole schedules, so
/// `get` never observes a partially written record.
pub trait ScheduleStore: Send + Sync {
    /// Stores `schedule`, marking its asset deposited.
    ///
    /// # Errors
    ///
    /// Returns `EscrowError::AlreadyDeposited` if the asset already has a
    /// schedule.
    fn create(&self, schedule: Schedule) -> Result<(), EscrowError>;

    /// Returns the schedule of a deposited asset.
    fn get(&self, asset_id: AssetId) -> Option<Schedule>;

    /// Deletes the schedule, clearing the deposited state, and returns it.
    ///
    /// # Errors
    ///
    /// Returns `EscrowError::NotDeposited` if the asset has no schedule.
    fn remove(&self, asset_id: AssetId) -> Result<Schedule, EscrowError>;

    /// All stored schedules, ordered by asset id.
    fn list(&self) -> Vec<Schedule>;

    /// Whether the asset is currently in escrow.
    fn is_deposited(&self, asset_id: AssetId) -> bool {
        self.get(asset_id).is_some()
    }
}
