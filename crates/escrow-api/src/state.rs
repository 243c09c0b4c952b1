//! Shared application state.

use std::sync::Arc;

use escrow_core::clock::Clock;
use escrow_core::custody::CustodyService;
use escrow_schedule::domain::store::ScheduleStore;
use escrow_store::InMemoryTokenLedger;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock read once per request.
    pub clock: Arc<dyn Clock>,
    /// Schedules of deposited assets.
    pub schedules: Arc<dyn ScheduleStore>,
    /// Custody collaborator used by deposit and release.
    pub custody: Arc<dyn CustodyService>,
    /// Reference token ledger backing the token endpoints.
    pub ledger: Arc<InMemoryTokenLedger>,
}

impl AppState {
    /// Create new application state in which the token ledger is also the
    /// custody collaborator.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        schedules: Arc<dyn ScheduleStore>,
        ledger: Arc<InMemoryTokenLedger>,
    ) -> Self {
        Self {
            clock,
            schedules,
            custody: Arc::clone(&ledger) as Arc<dyn CustodyService>,
            ledger,
        }
    }

    /// Replaces the custody collaborator, leaving the token ledger in place.
    #[must_use]
    pub fn with_custody(mut self, custody: Arc<dyn CustodyService>) -> Self {
        self.custody = custody;
        self
    }
}
