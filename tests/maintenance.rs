//! Contract queries and keeper transactions against an in-memory contract.

mod common;

use alloy::primitives::Address;
use std::sync::Arc;
use std::time::Duration;

use common::{tokens, MockBinder, MockRewardContract, MockState, ScriptedWallet, TEST_ADDRESS, TX_HASH};
use reward_client::blockchain::contract::ContractAction;
use reward_client::blockchain::types::{CallError, ClaimError};
use reward_client::claim::{ClaimOutcome, ContractBinding, WalletSession};
use reward_client::config::ContractConfig;
use reward_client::lifecycle::Abandon;
use reward_client::maintenance::{ContractActions, ContractQueries};

#[tokio::test]
async fn test_info_collects_contract_state() {
    let contract = MockRewardContract::new();
    let queries = ContractQueries::new(contract, &ContractConfig::default());

    let info = queries.info().await.unwrap();

    assert_eq!(info.address, common::CONTRACT_ADDRESS);
    assert_eq!(info.owner, TEST_ADDRESS);
    assert_eq!(info.last_winner, Address::ZERO);
    assert!(info.upkeep_needed);
}

#[tokio::test]
async fn test_info_fails_when_contract_unreachable() {
    let contract = MockRewardContract::with_state(MockState {
        reads_unavailable: true,
        ..MockState::default()
    });
    let queries = ContractQueries::new(contract, &ContractConfig::default());

    let err = queries.info().await.unwrap_err();
    assert!(matches!(err, ClaimError::OracleOrContractUnavailable(_)));
}

#[tokio::test]
async fn test_token_balance_is_formatted_with_symbol() {
    let queries = ContractQueries::new(MockRewardContract::new(), &ContractConfig::default());

    let balance = queries.token_balance(TEST_ADDRESS).await.unwrap();

    assert_eq!(balance.raw, tokens(100));
    assert_eq!(balance.to_string(), "100.000000000000000000 RWT");
}

#[tokio::test]
async fn test_dynamic_reward_scales_base_amount() {
    let queries = ContractQueries::new(MockRewardContract::new(), &ContractConfig::default());

    let reward = queries.dynamic_reward("10").await.unwrap();
    assert_eq!(reward.raw, tokens(11));

    assert!(matches!(
        queries.dynamic_reward("ten").await,
        Err(ClaimError::InvalidAmount(_))
    ));
}

#[tokio::test]
async fn test_run_lottery_submits_with_margin() {
    let contract = MockRewardContract::new();
    let mut session = WalletSession::new();
    session.connect(ScriptedWallet::unlocked().as_ref()).await.unwrap();
    let binding = ContractBinding::bind(&session, &MockBinder(contract.clone())).unwrap();
    let actions = ContractActions::new(&binding, 120, common::fast_policy(Duration::from_secs(5)));
    let abandon = Abandon::new();
    let mut rx = abandon.subscribe();

    let outcome = actions.run_lottery(&mut rx).await.unwrap();

    assert_eq!(
        outcome,
        ClaimOutcome::Confirmed {
            tx_hash: TX_HASH,
            block_number: 42
        }
    );
    assert_eq!(contract.last_sent(), Some((ContractAction::RunLottery, 120_000)));
}

#[tokio::test]
async fn test_update_prices_not_sent_when_simulation_reverts() {
    let contract = MockRewardContract::with_state(MockState {
        estimate_error: Some(CallError::Reverted(
            "execution reverted: Only upkeep contract".to_string(),
        )),
        ..MockState::default()
    });
    let mut session = WalletSession::new();
    session.connect(ScriptedWallet::unlocked().as_ref()).await.unwrap();
    let binding = ContractBinding::bind(&session, &MockBinder(contract.clone())).unwrap();
    let actions = ContractActions::new(&binding, 120, common::fast_policy(Duration::from_secs(5)));
    let abandon = Abandon::new();
    let mut rx = abandon.subscribe();

    let err = actions.update_prices(&mut rx).await.unwrap_err();

    assert!(matches!(err, ClaimError::SimulationReverted { reason } if reason.contains("upkeep")));
    assert_eq!(contract.sends(), 0);
}

#[tokio::test]
async fn test_keeper_cancelled_before_broadcast_sends_nothing() {
    let contract = MockRewardContract::new();
    let mut session = WalletSession::new();
    session.connect(ScriptedWallet::unlocked().as_ref()).await.unwrap();
    let binding = ContractBinding::bind(&session, &MockBinder(contract.clone())).unwrap();
    let actions = ContractActions::new(&binding, 120, common::fast_policy(Duration::from_secs(5)));
    let abandon = Arc::new(Abandon::new());
    let mut rx = abandon.subscribe();

    // A stale signal is dropped; one raised during estimation cancels.
    abandon.trigger();
    contract.abandon_during_estimate(abandon.clone());
    let err = actions.run_lottery(&mut rx).await.unwrap_err();

    assert!(matches!(err, ClaimError::Cancelled));
    assert_eq!(contract.estimates(), 1);
    assert_eq!(contract.sends(), 0);
}
