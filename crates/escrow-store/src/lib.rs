//! In-memory infrastructure for the turn-scheduled auction escrow.
//!
//! Provides the schedule store used by the API server and a reference token
//! ledger that acts as the custody collaborator.

pub mod memory_schedule_store;
pub mod token_ledger;

pub use memory_schedule_store::InMemoryScheduleStore;
pub use token_ledger::InMemoryTokenLedger;
