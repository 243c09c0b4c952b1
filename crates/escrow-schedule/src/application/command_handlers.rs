//! Command handlers for the escrow context.
//!
//! This module contains application-level command handler functions that
//! keep custody and the schedule store in step: custody moves first, the
//! store follows, and the resulting domain events are returned.

use escrow_core::clock::Clock;
use escrow_core::command::Command;
use escrow_core::custody::CustodyService;
use escrow_core::error::EscrowError;
use escrow_core::ids::AssetId;
use tracing::{debug, error, info, warn};

use crate::domain::commands::{DepositToken, ReleaseToken};
use crate::domain::events::{EscrowEvent, EscrowEventKind, TokenDeposited, TokenReleased};
use crate::domain::schedule::Schedule;
use crate::domain::store::ScheduleStore;

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct EscrowCommandResult {
    /// The asset affected by the command.
    pub asset_id: AssetId,
    /// The domain events produced.
    pub events: Vec<EscrowEvent>,
}

/// Handles the `DepositToken` command: validates the schedule, moves the asset
/// into escrow, then records the schedule.
///
/// If the store refuses the schedule after the transfer (a concurrent deposit
/// claimed the slot first), the asset is handed back to the depositor before
/// the error is returned.
///
/// # Errors
///
/// Returns `EscrowError::InvalidSchedule` for a non-positive duration or turn
/// count, `EscrowError::AlreadyDeposited` if the asset is already escrowed,
/// and any error raised by the custody service. If the hand-back itself
/// fails, the asset is left in escrow and `EscrowError::Infrastructure`
/// names both failures.
pub async fn handle_deposit(
    command: &DepositToken,
    clock: &dyn Clock,
    store: &dyn ScheduleStore,
    custody: &dyn CustodyService,
) -> Result<EscrowCommandResult, EscrowError> {
    debug!(
        command_type = command.command_type(),
        asset_id = %command.asset_id(),
        correlation_id = %command.correlation_id(),
        "handling command"
    );

    let schedule = Schedule::new(
        command.asset_id,
        command.start_time,
        command.turn_duration,
        command.turn_count,
    )?;

    if store.is_deposited(command.asset_id) {
        return Err(EscrowError::AlreadyDeposited(command.asset_id));
    }

    custody
        .transfer_into_escrow(command.asset_id, command.depositor)
        .await?;

    if let Err(err) = store.create(schedule) {
        warn!(
            asset_id = %command.asset_id,
            error = %err,
            "schedule rejected after transfer-in; returning asset to depositor"
        );
        if let Err(rollback_err) = custody
            .transfer_out_of_escrow(command.asset_id, command.depositor)
            .await
        {
            error!(
                asset_id = %command.asset_id,
                depositor = %command.depositor,
                error = %err,
                rollback_error = %rollback_err,
                "asset stranded in escrow without a schedule"
            );
            return Err(EscrowError::Infrastructure(format!(
                "asset {} stranded in escrow after {err}: {rollback_err}",
                command.asset_id
            )));
        }
        return Err(err);
    }

    info!(
        asset_id = %command.asset_id,
        start_time = schedule.start_time(),
        turn_duration = schedule.turn_duration(),
        total_turns = schedule.total_turns(),
        "asset deposited into escrow"
    );

    let event = EscrowEvent::record(
        EscrowEventKind::TokenDeposited(TokenDeposited {
            asset_id: command.asset_id,
            depositor: command.depositor,
            start_time: schedule.start_time(),
            turn_duration: schedule.turn_duration(),
            total_turns: schedule.total_turns(),
        }),
        command.correlation_id,
        clock,
    );

    Ok(EscrowCommandResult {
        asset_id: command.asset_id,
        events: vec![event],
    })
}

/// Handles the `ReleaseToken` command: moves the asset out of escrow to the
/// recipient, then removes its schedule.
///
/// Concurrent releases of one asset are settled by custody: only one
/// transfer-out of a held asset may succeed, so only one caller reaches the
/// schedule removal.
///
/// # Errors
///
/// Returns `EscrowError::NotDeposited` if the asset has no schedule, and any
/// error raised by the custody service. When custody refuses, the schedule
/// stays in place.
pub async fn handle_release(
    command: &ReleaseToken,
    clock: &dyn Clock,
    store: &dyn ScheduleStore,
    custody: &dyn CustodyService,
) -> Result<EscrowCommandResult, EscrowError> {
    debug!(
        command_type = command.command_type(),
        asset_id = %command.asset_id(),
        correlation_id = %command.correlation_id(),
        "handling command"
    );

    let now = clock.unix_seconds();
    let phase = store
        .get(command.asset_id)
        .ok_or(EscrowError::NotDeposited(command.asset_id))?
        .phase(now);

    custody
        .transfer_out_of_escrow(command.asset_id, command.recipient)
        .await?;

    store.remove(command.asset_id)?;

    info!(
        asset_id = %command.asset_id,
        recipient = %command.recipient,
        ?phase,
        "asset released from escrow"
    );

    let event = EscrowEvent::record(
        EscrowEventKind::TokenReleased(TokenReleased {
            asset_id: command.asset_id,
            recipient: command.recipient,
            phase,
        }),
        command.correlation_id,
        clock,
    );

    Ok(EscrowCommandResult {
        asset_id: command.asset_id,
        events: vec![event],
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use chrono::{TimeZone, Utc};
    use escrow_core::error::EscrowError;
    use escrow_core::event::DomainEvent;
    use escrow_core::ids::{AccountId, AssetId};
    use uuid::Uuid;

    use crate::application::command_handlers::{handle_deposit, handle_release};
    use crate::domain::commands::{DepositToken, ReleaseToken};
    use crate::domain::events::EscrowEventKind;
    use crate::domain::schedule::Schedule;
    use crate::domain::store::ScheduleStore;
    use crate::domain::turn::TurnPhase;
    use escrow_test_support::{
        FailingCustody, FixedClock, OneWayCustody, RecordingCustody, RejectingCustody, Transfer,
    };

    /// Minimal map-backed store for exercising handlers.
    #[derive(Debug, Default)]
    pub(crate) struct MapStore(Mutex<BTreeMap<AssetId, Schedule>>);

    impl ScheduleStore for MapStore {
        fn create(&self, schedule: Schedule) -> Result<(), EscrowError> {
            let mut map = self.0.lock().unwrap();
            if map.contains_key(&schedule.asset_id()) {
                return Err(EscrowError::AlreadyDeposited(schedule.asset_id()));
            }
            map.insert(schedule.asset_id(), schedule);
            Ok(())
        }

        fn get(&self, asset_id: AssetId) -> Option<Schedule> {
            self.0.lock().unwrap().get(&asset_id).copied()
        }

        fn remove(&self, asset_id: AssetId) -> Result<Schedule, EscrowError> {
            self.0
                .lock()
                .unwrap()
                .remove(&asset_id)
                .ok_or(EscrowError::NotDeposited(asset_id))
        }

        fn list(&self) -> Vec<Schedule> {
            self.0.lock().unwrap().values().copied().collect()
        }
    }

    /// Store whose `get` never sees a schedule but whose `create` always
    /// reports one, as happens when a concurrent deposit wins the slot.
    #[derive(Debug)]
    struct RacingStore;

    impl ScheduleStore for RacingStore {
        fn create(&self, schedule: Schedule) -> Result<(), EscrowError> {
            Err(EscrowError::AlreadyDeposited(schedule.asset_id()))
        }

        fn get(&self, _asset_id: AssetId) -> Option<Schedule> {
            None
        }

        fn remove(&self, asset_id: AssetId) -> Result<Schedule, EscrowError> {
            Err(EscrowError::NotDeposited(asset_id))
        }

        fn list(&self) -> Vec<Schedule> {
            Vec::new()
        }
    }

    const T: i64 = 1_768_471_200;

    fn clock_at(seconds: i64) -> FixedClock {
        FixedClock(Utc.timestamp_opt(seconds, 0).unwrap())
    }

    fn deposit(asset_id: u64, depositor: AccountId, turn_duration: i64, turn_count: i64) -> DepositToken {
        DepositToken {
            correlation_id: Uuid::new_v4(),
            asset_id: AssetId(asset_id),
            depositor,
            start_time: T + 100,
            turn_duration,
            turn_count,
        }
    }

    #[tokio::test]
    async fn test_handle_deposit_transfers_in_and_stores_schedule() {
        // Arrange
        let clock = clock_at(T);
        let store = MapStore::default();
        let custody = RecordingCustody::new();
        let depositor = AccountId::new_v4();
        let command = deposit(0, depositor, 3_600, 5);

        // Act
        let result = handle_deposit(&command, &clock, &store, &custody).await;

        // Assert
        let cmd_result = result.unwrap();
        assert_eq!(cmd_result.asset_id, AssetId(0));
        assert_eq!(
            custody.transfers(),
            vec![Transfer::In {
                asset_id: AssetId(0),
                from: depositor
            }]
        );

        let schedule = store.get(AssetId(0)).unwrap();
        assert_eq!(schedule.start_time(), T + 100);
        assert_eq!(schedule.turn_duration(), 3_600);
        assert_eq!(schedule.total_turns(), 5);

        assert_eq!(cmd_result.events.len(), 1);
        let event = &cmd_result.events[0];
        assert_eq!(event.event_type(), "escrow.token_deposited");
        assert_eq!(event.metadata().correlation_id, command.correlation_id);
        assert_eq!(event.metadata().occurred_at, clock.0);
        match &event.kind {
            EscrowEventKind::TokenDeposited(payload) => {
                assert_eq!(payload.depositor, depositor);
                assert_eq!(payload.total_turns, 5);
            }
            other => panic!("expected TokenDeposited, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_deposit_twice_returns_already_deposited() {
        // Arrange
        let clock = clock_at(T);
        let store = MapStore::default();
        let custody = RecordingCustody::new();
        let depositor = AccountId::new_v4();
        handle_deposit(&deposit(0, depositor, 3_600, 5), &clock, &store, &custody)
            .await
            .unwrap();

        // Act
        let result = handle_deposit(&deposit(0, depositor, 60, 2), &clock, &store, &custody).await;

        // Assert
        assert_eq!(result.unwrap_err(), EscrowError::AlreadyDeposited(AssetId(0)));
        assert_eq!(custody.transfers().len(), 1);
        assert_eq!(store.get(AssetId(0)).unwrap().turn_duration(), 3_600);
    }

    #[tokio::test]
    async fn test_handle_deposit_rejects_zero_duration_without_side_effects() {
        // Arrange
        let clock = clock_at(T);
        let store = MapStore::default();
        let custody = RecordingCustody::new();

        // Act
        let result = handle_deposit(
            &deposit(0, AccountId::new_v4(), 0, 3),
            &clock,
            &store,
            &custody,
        )
        .await;

        // Assert
        assert!(matches!(result, Err(EscrowError::InvalidSchedule(_))));
        assert!(custody.transfers().is_empty());
        assert!(!store.is_deposited(AssetId(0)));
    }

    #[tokio::test]
    async fn test_handle_deposit_rejects_negative_turn_count_without_side_effects() {
        // Arrange
        let clock = clock_at(T);
        let store = MapStore::default();
        let custody = RecordingCustody::new();

        // Act
        let result = handle_deposit(
            &deposit(0, AccountId::new_v4(), 3_600, -1),
            &clock,
            &store,
            &custody,
        )
        .await;

        // Assert
        assert!(matches!(result, Err(EscrowError::InvalidSchedule(_))));
        assert!(custody.transfers().is_empty());
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn test_handle_deposit_leaves_no_schedule_when_custody_rejects() {
        // Arrange
        let clock = clock_at(T);
        let store = MapStore::default();
        let custody = RejectingCustody("depositor does not own asset 0");

        // Act
        let result = handle_deposit(
            &deposit(0, AccountId::new_v4(), 3_600, 3),
            &clock,
            &store,
            &custody,
        )
        .await;

        // Assert
        match result.unwrap_err() {
            EscrowError::Custody(msg) => assert!(msg.contains("does not own")),
            other => panic!("expected Custody, got {other:?}"),
        }
        assert!(!store.is_deposited(AssetId(0)));
    }

    #[tokio::test]
    async fn test_handle_deposit_propagates_custody_infrastructure_failure() {
        let clock = clock_at(T);
        let store = MapStore::default();

        let result = handle_deposit(
            &deposit(0, AccountId::new_v4(), 3_600, 3),
            &clock,
            &store,
            &FailingCustody,
        )
        .await;

        assert!(matches!(result, Err(EscrowError::Infrastructure(_))));
        assert!(!store.is_deposited(AssetId(0)));
    }

    #[tokio::test]
    async fn test_handle_deposit_returns_asset_when_store_loses_race() {
        // Arrange
        let clock = clock_at(T);
        let custody = RecordingCustody::new();
        let depositor = AccountId::new_v4();

        // Act
        let result = handle_deposit(
            &deposit(3, depositor, 3_600, 3),
            &clock,
            &RacingStore,
            &custody,
        )
        .await;

        // Assert
        assert_eq!(result.unwrap_err(), EscrowError::AlreadyDeposited(AssetId(3)));
        assert_eq!(
            custody.transfers(),
            vec![
                Transfer::In {
                    asset_id: AssetId(3),
                    from: depositor
                },
                Transfer::Out {
                    asset_id: AssetId(3),
                    to: depositor
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_handle_deposit_reports_stranded_asset_when_hand_back_fails() {
        // Arrange
        let clock = clock_at(T);
        let custody = OneWayCustody::new("ledger down");
        let depositor = AccountId::new_v4();

        // Act
        let result = handle_deposit(
            &deposit(4, depositor, 3_600, 3),
            &clock,
            &RacingStore,
            &custody,
        )
        .await;

        // Assert
        match result.unwrap_err() {
            EscrowError::Infrastructure(msg) => {
                assert!(msg.contains("asset 4 stranded in escrow"), "{msg}");
                assert!(msg.contains("already deposited"), "{msg}");
                assert!(msg.contains("ledger down"), "{msg}");
            }
            other => panic!("expected Infrastructure, got {other:?}"),
        }
        assert_eq!(
            custody.transfers(),
            vec![Transfer::In {
                asset_id: AssetId(4),
                from: depositor
            }]
        );
        assert!(!RacingStore.is_deposited(AssetId(4)));
    }

    #[tokio::test]
    async fn test_handle_release_transfers_out_and_removes_schedule() {
        // Arrange
        let store = MapStore::default();
        let custody = RecordingCustody::new();
        let depositor = AccountId::new_v4();
        let winner = AccountId::new_v4();
        handle_deposit(&deposit(1, depositor, 3_600, 3), &clock_at(T), &store, &custody)
            .await
            .unwrap();
        let clock = clock_at(T + 100 + 3 * 3_600);
        let command = ReleaseToken {
            correlation_id: Uuid::new_v4(),
            asset_id: AssetId(1),
            recipient: winner,
        };

        // Act
        let result = handle_release(&command, &clock, &store, &custody).await;

        // Assert
        let cmd_result = result.unwrap();
        assert!(!store.is_deposited(AssetId(1)));
        assert_eq!(
            custody.transfers().last(),
            Some(&Transfer::Out {
                asset_id: AssetId(1),
                to: winner
            })
        );
        assert_eq!(cmd_result.events.len(), 1);
        match &cmd_result.events[0].kind {
            EscrowEventKind::TokenReleased(payload) => {
                assert_eq!(payload.recipient, winner);
                assert_eq!(payload.phase, TurnPhase::Expired);
            }
            other => panic!("expected TokenReleased, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_release_returns_not_deposited_for_unknown_asset() {
        // Arrange
        let store = MapStore::default();
        let custody = RecordingCustody::new();
        let command = ReleaseToken {
            correlation_id: Uuid::new_v4(),
            asset_id: AssetId(42),
            recipient: AccountId::new_v4(),
        };

        // Act
        let result = handle_release(&command, &clock_at(T), &store, &custody).await;

        // Assert
        assert_eq!(result.unwrap_err(), EscrowError::NotDeposited(AssetId(42)));
        assert!(custody.transfers().is_empty());
    }

    #[tokio::test]
    async fn test_handle_release_keeps_schedule_when_custody_fails() {
        // Arrange
        let store = MapStore::default();
        store
            .create(Schedule::new(AssetId(5), T, 60, 2).unwrap())
            .unwrap();
        let command = ReleaseToken {
            correlation_id: Uuid::new_v4(),
            asset_id: AssetId(5),
            recipient: AccountId::new_v4(),
        };

        // Act
        let result = handle_release(&command, &clock_at(T), &store, &FailingCustody).await;

        // Assert
        assert!(matches!(result, Err(EscrowError::Infrastructure(_))));
        assert!(store.is_deposited(AssetId(5)));
    }
}
