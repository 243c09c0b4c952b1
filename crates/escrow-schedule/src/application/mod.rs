//! Application layer for the escrow context.

pub mod command_handlers;
pub mod query_handlers;
