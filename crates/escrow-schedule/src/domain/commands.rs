//! Commands for the escrow context.

use escrow_core::command::Command;
use escrow_core::ids::{AccountId, AssetId};
use uuid::Uuid;

/// Command to deposit an asset into escrow under a turn schedule.
#[derive(Debug, Clone)]
pub struct DepositToken {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The asset to escrow.
    pub asset_id: AssetId,
    /// Current owner handing the asset over.
    pub depositor: AccountId,
    /// Start of turn 1, in Unix seconds.
    pub start_time: i64,
    /// Seconds per turn; must be positive.
    pub turn_duration: i64,
    /// Number of turns; must be positive.
    pub turn_count: i64,
}

impl Command for DepositToken {
    fn command_type(&self) -> &'static str {
        "escrow.deposit_token"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn asset_id(&self) -> AssetId {
        self.asset_id
    }
}

/// Command to release an asset out of escrow.
#[derive(Debug, Clone)]
pub struct ReleaseToken {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The escrowed asset.
    pub asset_id: AssetId,
    /// Account receiving the asset, as decided by the auction.
    pub recipient: AccountId,
}

impl Command for ReleaseToken {
    fn command_type(&self) -> &'static str {
        "escrow.release_token"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn asset_id(&self) -> AssetId {
        self.asset_id
    }
}
