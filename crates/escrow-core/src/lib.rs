//! Escrow Core — shared domain abstractions.
//!
//! This crate defines the traits and types the escrow context depends on:
//! time, identifiers, commands, events, errors and the custody boundary.
//! It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod custody;
pub mod error;
pub mod event;
pub mod ids;
