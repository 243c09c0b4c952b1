//! Auction escrow HTTP API.
//!
//! The binary in `main.rs` wires these modules to the in-memory store and
//! token ledger; integration tests build the same router against test clocks.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
