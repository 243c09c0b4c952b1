//! Shared test clocks and custody doubles for the auction escrow.

mod clock;
mod custody;

pub use clock::{FixedClock, ManualClock};
pub use custody::{FailingCustody, OneWayCustody, RecordingCustody, RejectingCustody, Transfer};
