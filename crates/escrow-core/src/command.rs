//! Commands accepted by the escrow application layer.

use uuid::Uuid;

use crate::ids::AssetId;

/// A request to change escrow state for one asset.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable dotted name, e.g. `escrow.deposit_token`.
    fn command_type(&self) -> &'static str;

    /// Id shared by the command and every event it produces.
    fn correlation_id(&self) -> Uuid;

    /// The asset the command acts on.
    fn asset_id(&self) -> AssetId;
}
