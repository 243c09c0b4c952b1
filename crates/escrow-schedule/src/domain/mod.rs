//! Domain layer for the escrow context.

pub mod commands;
pub mod events;
pub mod schedule;
pub mod store;
pub mod turn;
