//! Custody collaborator abstraction.
//!
//! Asset custody is external to the escrow core. The core asks the
//! collaborator to move an asset in before a schedule is created, and out
//! before a schedule is removed.

use async_trait::async_trait;

use crate::error::EscrowError;
use crate::ids::{AccountId, AssetId};

/// Service that holds and moves uniquely identified assets.
///
/// Implementations must serialize transfers per asset. Of several concurrent
/// `transfer_out_of_escrow` calls for one held asset, exactly one succeeds
/// and the rest fail because escrow no longer holds it. The release handler
/// relies on this to decide which caller removes the schedule.
#[async_trait]
pub trait CustodyService: Send + Sync {
    /// Returns the current owner of the asset, or `None` for an unknown asset.
    async fn owner_of(&self, asset_id: AssetId) -> Result<Option<AccountId>, EscrowError>;

    /// Moves the asset from `from` into the escrow account.
    async fn transfer_into_escrow(&self, asset_id: AssetId, from: AccountId)
    -> Result<(), EscrowError>;

    /// Moves the asset from the escrow account to `to`.
    ///
    /// Fails when escrow does not hold the asset, including when a concurrent
    /// call already moved it out.
    async fn transfer_out_of_escrow(&self, asset_id: AssetId, to: AccountId)
    -> Result<(), EscrowError>;
}
