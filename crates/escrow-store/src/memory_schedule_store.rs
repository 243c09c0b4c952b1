//! In-memory implementation of the `ScheduleStore` trait.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{PoisonError, RwLock};

use escrow_core::error::EscrowError;
use escrow_core::ids::AssetId;
use escrow_schedule::domain::schedule::Schedule;
use escrow_schedule::domain::store::ScheduleStore;
use tracing::debug;

/// Schedule store backed by a `HashMap` behind an `RwLock`.
///
/// Readers share the lock. `create` and `remove` hold the write lock for the
/// whole check-and-mutate step, so two deposits of one asset cannot both
/// succeed.
#[derive(Debug, Default)]
pub struct InMemoryScheduleStore {
    schedules: RwLock<HashMap<AssetId, Schedule>>,
}

impl InMemoryScheduleStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// Schedules are `Copy` and written whole, so a poisoned lock never guards a
// half-written entry.
impl ScheduleStore for InMemoryScheduleStore {
    fn create(&self, schedule: Schedule) -> Result<(), EscrowError> {
        let mut schedules = self
            .schedules
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match schedules.entry(schedule.asset_id()) {
            Entry::Occupied(_) => Err(EscrowError::AlreadyDeposited(schedule.asset_id())),
            Entry::Vacant(slot) => {
                slot.insert(schedule);
                debug!(asset_id = %schedule.asset_id(), "schedule stored");
                Ok(())
            }
        }
    }

    fn get(&self, asset_id: AssetId) -> Option<Schedule> {
        self.schedules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&asset_id)
            .copied()
    }

    fn remove(&self, asset_id: AssetId) -> Result<Schedule, EscrowError> {
        let removed = self
            .schedules
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&asset_id)
            .ok_or(EscrowError::NotDeposited(asset_id))?;
        debug!(%asset_id, "schedule removed");
        Ok(removed)
    }

    fn list(&self) -> Vec<Schedule> {
        let mut schedules: Vec<Schedule> = self
            .schedules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .copied()
            .collect();
        schedules.sort_by_key(Schedule::asset_id);
        schedules
    }
}
