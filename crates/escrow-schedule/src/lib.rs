//! Auction escrow — schedule bounded context.
//!
//! Responsible for the escrow schedule of each deposited asset, computing
//! the current turn from an injected instant, and the deposit/release
//! lifecycle that keeps schedules and custody in step.

pub mod application;
pub mod domain;
