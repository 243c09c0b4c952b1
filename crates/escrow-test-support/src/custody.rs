//! Test custody services — mock `CustodyService` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use escrow_core::custody::CustodyService;
use escrow_core::error::EscrowError;
use escrow_core::ids::{AccountId, AssetId};

/// A transfer observed by [`RecordingCustody`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    /// Asset moved from `from` into escrow.
    In {
        /// The asset moved.
        asset_id: AssetId,
        /// Previous owner.
        from: AccountId,
    },
    /// Asset moved out of escrow to `to`.
    Out {
        /// The asset moved.
        asset_id: AssetId,
        /// New owner.
        to: AccountId,
    },
}

/// A custody service that accepts every transfer and records it in order.
/// `owner_of` always reports no owner.
#[derive(Debug, Default)]
pub struct RecordingCustody {
    transfers: Mutex<Vec<Transfer>>,
}

impl RecordingCustody {
    /// Create an empty recording custody service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all transfers performed.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn transfers(&self) -> Vec<Transfer> {
        self.transfers.lock().unwrap().clone()
    }
}

#[async_trait]
impl CustodyService for RecordingCustody {
    async fn owner_of(&self, _asset_id: AssetId) -> Result<Option<AccountId>, EscrowError> {
        Ok(None)
    }

    async fn transfer_into_escrow(
        &self,
        asset_id: AssetId,
        from: AccountId,
    ) -> Result<(), EscrowError> {
        self.transfers
            .lock()
            .unwrap()
            .push(Transfer::In { asset_id, from });
        Ok(())
    }

    async fn transfer_out_of_escrow(
        &self,
        asset_id: AssetId,
        to: AccountId,
    ) -> Result<(), EscrowError> {
        self.transfers
            .lock()
            .unwrap()
            .push(Transfer::Out { asset_id, to });
        Ok(())
    }
}

/// A custody service that refuses every request with `EscrowError::Custody`.
/// Useful for testing ownership and approval failures.
#[derive(Debug)]
pub struct RejectingCustody(pub &'static str);

#[async_trait]
impl CustodyService for RejectingCustody {
    async fn owner_of(&self, _asset_id: AssetId) -> Result<Option<AccountId>, EscrowError> {
        Err(EscrowError::Custody(self.0.into()))
    }

    async fn transfer_into_escrow(
        &self,
        _asset_id: AssetId,
        _from: AccountId,
    ) -> Result<(), EscrowError> {
        Err(EscrowError::Custody(self.0.into()))
    }

    async fn transfer_out_of_escrow(
        &self,
        _asset_id: AssetId,
        _to: AccountId,
    ) -> Result<(), EscrowError> {
        Err(EscrowError::Custody(self.0.into()))
    }
}

/// A custody service that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingCustody;

#[async_trait]
impl CustodyService for FailingCustody {
    async fn owner_of(&self, _asset_id: AssetId) -> Result<Option<AccountId>, EscrowError> {
        Err(EscrowError::Infrastructure("connection refused".into()))
    }

    async fn transfer_into_escrow(
        &self,
        _asset_id: AssetId,
        _from: AccountId,
    ) -> Result<(), EscrowError> {
        Err(EscrowError::Infrastructure("connection refused".into()))
    }

    async fn transfer_out_of_escrow(
        &self,
        _asset_id: AssetId,
        _to: AccountId,
    ) -> Result<(), EscrowError> {
        Err(EscrowError::Infrastructure("connection refused".into()))
    }
}

/// A custody service that accepts and records transfers into escrow but
/// fails every transfer out with `EscrowError::Infrastructure`. Useful for
/// testing a hand-back that cannot complete.
#[derive(Debug)]
pub struct OneWayCustody {
    reason: &'static str,
    inner: RecordingCustody,
}

impl OneWayCustody {
    /// Create a custody service whose transfers out fail with `reason`.
    #[must_use]
    pub fn new(reason: &'static str) -> Self {
        Self {
            reason,
            inner: RecordingCustody::new(),
        }
    }

    /// Returns a snapshot of the transfers that went through.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn transfers(&self) -> Vec<Transfer> {
        self.inner.transfers()
    }
}

#[async_trait]
impl CustodyService for OneWayCustody {
    async fn owner_of(&self, asset_id: AssetId) -> Result<Option<AccountId>, EscrowError> {
        self.inner.owner_of(asset_id).await
    }

    async fn transfer_into_escrow(
        &self,
        asset_id: AssetId,
        from: AccountId,
    ) -> Result<(), EscrowError> {
        self.inner.transfer_into_escrow(asset_id, from).await
    }

    async fn transfer_out_of_escrow(
        &self,
        _asset_id: AssetId,
        _to: AccountId,
    ) -> Result<(), EscrowError> {
        Err(EscrowError::Infrastructure(self.reason.into()))
    }
}
