//! Domain events for the escrow context.

use escrow_core::clock::Clock;
use escrow_core::event::{DomainEvent, EventMetadata};
use escrow_core::ids::{AccountId, AssetId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::turn::TurnPhase;

/// Emitted when an asset enters escrow and its schedule is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDeposited {
    /// The escrowed asset.
    pub asset_id: AssetId,
    /// Owner that handed the asset over.
    pub depositor: AccountId,
    /// Start of turn 1, in Unix seconds.
    pub start_time: i64,
    /// Seconds per turn.
    pub turn_duration: u64,
    /// Number of turns.
    pub total_turns: u64,
}

/// Emitted when an asset leaves escrow and its schedule is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenReleased {
    /// The released asset.
    pub asset_id: AssetId,
    /// Account that received the asset.
    pub recipient: AccountId,
    /// Phase the schedule was in when released.
    pub phase: TurnPhase,
}

/// Event type identifier for [`TokenDeposited`].
pub const TOKEN_DEPOSITED_EVENT_TYPE: &str = "escrow.token_deposited";

/// Event type identifier for [`TokenReleased`].
pub const TOKEN_RELEASED_EVENT_TYPE: &str = "escrow.token_released";

/// Event payload variants for the escrow context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowEventKind {
    /// An asset was deposited.
    TokenDeposited(TokenDeposited),
    /// An asset was released.
    TokenReleased(TokenReleased),
}

impl EscrowEventKind {
    fn event_type(&self) -> &'static str {
        match self {
            Self::TokenDeposited(_) => TOKEN_DEPOSITED_EVENT_TYPE,
            Self::TokenReleased(_) => TOKEN_RELEASED_EVENT_TYPE,
        }
    }

    fn asset_id(&self) -> AssetId {
        match self {
            Self::TokenDeposited(payload) => payload.asset_id,
            Self::TokenReleased(payload) => payload.asset_id,
        }
    }
}

/// Domain event envelope for the escrow context.
#[derive(Debug, Clone)]
pub struct EscrowEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: EscrowEventKind,
}

impl EscrowEvent {
    /// Wraps `kind` in metadata stamped with the clock's current time.
    #[must_use]
    pub fn record(kind: EscrowEventKind, correlation_id: Uuid, clock: &dyn Clock) -> Self {
        Self {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                asset_id: kind.asset_id(),
                correlation_id,
                causation_id: correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        }
    }
}

impl DomainEvent for EscrowEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("EscrowEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
