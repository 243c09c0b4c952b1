//! Reference custody collaborator.
//!
//! A minimal non-fungible token ledger: tokens are minted to an owner with
//! sequential ids, an owner approves the escrow account to move a token, and
//! escrow pulls approved tokens in and pushes held tokens out.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use escrow_core::custody::CustodyService;
use escrow_core::error::EscrowError;
use escrow_core::ids::{AccountId, AssetId};
use tracing::{debug, info};

#[derive(Debug, Default)]
struct LedgerState {
    next_id: u64,
    owners: HashMap<AssetId, AccountId>,
    approved: HashSet<AssetId>,
}

impl LedgerState {
    fn owner(&self, asset_id: AssetId) -> Result<AccountId, EscrowError> {
        self.owners
            .get(&asset_id)
            .copied()
            .ok_or_else(|| EscrowError::Custody(format!("asset {asset_id} does not exist")))
    }
}

/// In-memory token ledger whose escrow account acts as custodian.
///
/// All mutations happen under one lock, so every transfer is checked and
/// applied atomically.
#[derive(Debug)]
pub struct InMemoryTokenLedger {
    escrow_account: AccountId,
    state: Mutex<LedgerState>,
}

impl InMemoryTokenLedger {
    /// Creates an empty ledger in which `escrow_account` holds escrowed tokens.
    #[must_use]
    pub fn new(escrow_account: AccountId) -> Self {
        Self {
            escrow_account,
            state: Mutex::new(LedgerState::default()),
        }
    }

    /// The account that holds deposited tokens.
    #[must_use]
    pub fn escrow_account(&self) -> AccountId {
        self.escrow_account
    }

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        // Every mutation completes before the guard drops.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mints a new token to `owner` and returns its id. Ids start at 0.
    #[must_use]
    pub fn mint(&self, owner: AccountId) -> AssetId {
        let mut state = self.state();
        let asset_id = AssetId(state.next_id);
        state.next_id += 1;
        state.owners.insert(asset_id, owner);
        info!(%asset_id, %owner, "token minted");
        asset_id
    }

    /// Approves the escrow account to move `asset_id` on behalf of `owner`.
    ///
    /// # Errors
    ///
    /// Returns `EscrowError::Custody` if the token does not exist or `owner`
    /// does not own it.
    pub fn approve(&self, asset_id: AssetId, owner: AccountId) -> Result<(), EscrowError> {
        let mut state = self.state();
        if state.owner(asset_id)? != owner {
            return Err(EscrowError::Custody(format!(
                "{owner} does not own asset {asset_id}"
            )));
        }
        state.approved.insert(asset_id);
        debug!(%asset_id, %owner, "escrow approved");
        Ok(())
    }

    /// Whether escrow is currently approved to move `asset_id`.
    #[must_use]
    pub fn is_approved(&self, asset_id: AssetId) -> bool {
        self.state().approved.contains(&asset_id)
    }
}

#[async_trait]
impl CustodyService for InMemoryTokenLedger {
    async fn owner_of(&self, asset_id: AssetId) -> Result<Option<AccountId>, EscrowError> {
        Ok(self.state().owners.get(&asset_id).copied())
    }

    async fn transfer_into_escrow(
        &self,
        asset_id: AssetId,
        from: AccountId,
    ) -> Result<(), EscrowError> {
        let mut state = self.state();
        if state.owner(asset_id)? != from {
            return Err(EscrowError::Custody(format!(
                "{from} does not own asset {asset_id}"
            )));
        }
        if !state.approved.remove(&asset_id) {
            return Err(EscrowError::Custody(format!(
                "escrow is not approved to move asset {asset_id}"
            )));
        }
        state.owners.insert(asset_id, self.escrow_account);
        debug!(%asset_id, %from, "token transferred into escrow");
        Ok(())
    }

    async fn transfer_out_of_escrow(
        &self,
        asset_id: AssetId,
        to: AccountId,
    ) -> Result<(), EscrowError> {
        let mut state = self.state();
        if state.owner(asset_id)? != self.escrow_account {
            return Err(EscrowError::Custody(format!(
                "escrow does not hold asset {asset_id}"
            )));
        }
        state.owners.insert(asset_id, to);
        state.approved.remove(&asset_id);
        debug!(%asset_id, %to, "token transferred out of escrow");
        Ok(())
    }
}
