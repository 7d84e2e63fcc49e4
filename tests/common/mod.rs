//! Shared test doubles for integration tests.

#![allow(dead_code)]

use alloy::primitives::{address, Address, Bytes, TxHash, B256, U256};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reward_client::blockchain::contract::{ContractAction, RewardContract, UpkeepCheck};
use reward_client::blockchain::types::{
    CallError, CallResult, ClaimError, ClaimResult, ReceiptSummary,
};
use reward_client::blockchain::wallet::{LocalKeyWallet, SignerIdentity, WalletConnector};
use reward_client::claim::{ClaimSettings, ConfirmationPolicy, ContractBinder};
use reward_client::lifecycle::Abandon;

/// Anvil's first account.
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_ADDRESS: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");
pub const CONTRACT_ADDRESS: Address = address!("380afaa5051ca3bbde9c46ff71a3204662346057");
pub const TX_HASH: TxHash = B256::repeat_byte(0xab);
/// Network the test settings expect the wallet on.
pub const TEST_CHAIN_ID: u64 = 11155111;

/// One whole token at 18 decimals.
pub fn tokens(whole: u64) -> U256 {
    U256::from(whole) * U256::from(10u64).pow(U256::from(18u64))
}

/// What the mock reports when a receipt is polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptMode {
    /// Mined and successful in `block`.
    Success { block: u64 },
    /// Mined and reverted in `block`.
    Reverted { block: u64 },
    /// Never mined.
    Never,
}

#[derive(Debug, Clone)]
pub struct MockState {
    pub eligible: bool,
    /// Eligibility drops to false right after the first eligibility read.
    pub lose_eligibility_after_check: bool,
    pub balance: U256,
    pub gas_estimate: u64,
    pub estimate_error: Option<CallError>,
    pub send_error: Option<CallError>,
    pub receipt: ReceiptMode,
    pub current_block: u64,
    pub eth_price: Option<U256>,
    pub stored_usd_value: Option<U256>,
    pub reads_unavailable: bool,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            eligible: true,
            lose_eligibility_after_check: false,
            balance: tokens(100),
            gas_estimate: 100_000,
            estimate_error: None,
            send_error: None,
            receipt: ReceiptMode::Success { block: 42 },
            current_block: 42,
            eth_price: Some(U256::from(350_000_000_000u64)),
            stored_usd_value: Some(tokens(3500)),
            reads_unavailable: false,
        }
    }
}

/// Scriptable in-memory reward contract.
///
/// Estimation enforces the same rules as the deployed contract (eligible
/// signer, amount within balance), so state that changes after validation
/// shows up as a simulated revert.
#[derive(Default)]
pub struct MockRewardContract {
    state: Mutex<MockState>,
    pub eligibility_calls: AtomicUsize,
    pub balance_calls: AtomicUsize,
    pub estimate_calls: AtomicUsize,
    pub send_calls: AtomicUsize,
    pub sent: Mutex<Vec<(ContractAction, u64)>>,
    /// Fired once, from inside the next gas estimate.
    abandon_on_estimate: Mutex<Option<Arc<Abandon>>>,
}

impl MockRewardContract {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_state(state: MockState) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(state),
            ..Self::default()
        })
    }

    pub fn update(&self, f: impl FnOnce(&mut MockState)) {
        f(&mut self.state.lock().unwrap());
    }

    /// Trigger `abandon` while the next estimate is in progress.
    pub fn abandon_during_estimate(&self, abandon: Arc<Abandon>) {
        *self.abandon_on_estimate.lock().unwrap() = Some(abandon);
    }

    pub fn sends(&self) -> usize {
        self.send_calls.load(Ordering::SeqCst)
    }

    pub fn estimates(&self) -> usize {
        self.estimate_calls.load(Ordering::SeqCst)
    }

    pub fn last_sent(&self) -> Option<(ContractAction, u64)> {
        self.sent.lock().unwrap().last().copied()
    }

    fn snapshot(&self) -> MockState {
        self.state.lock().unwrap().clone()
    }

    fn read<T>(&self, value: T) -> CallResult<T> {
        if self.snapshot().reads_unavailable {
            return Err(CallError::Unavailable("connection refused".to_string()));
        }
        Ok(value)
    }
}

#[async_trait]
impl RewardContract for MockRewardContract {
    fn address(&self) -> Address {
        CONTRACT_ADDRESS
    }

    async fn is_eligible_for_reward(&self, _account: Address) -> CallResult<bool> {
        self.eligibility_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        if state.reads_unavailable {
            return Err(CallError::Unavailable("connection refused".to_string()));
        }
        let eligible = state.eligible;
        if state.lose_eligibility_after_check {
            state.eligible = false;
        }
        Ok(eligible)
    }

    async fn balance_of(&self, _account: Address) -> CallResult<U256> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        let balance = self.snapshot().balance;
        self.read(balance)
    }

    async fn estimate_gas(&self, action: ContractAction) -> CallResult<u64> {
        self.estimate_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(abandon) = self.abandon_on_estimate.lock().unwrap().take() {
            abandon.trigger();
        }
        let state = self.snapshot();
        if let Some(err) = state.estimate_error {
            return Err(err);
        }
        if let ContractAction::Claim(amount) = action {
            if !state.eligible {
                return Err(CallError::Reverted(
                    "execution reverted: Not eligible for reward".to_string(),
                ));
            }
            if amount > state.balance {
                return Err(CallError::Reverted(
                    "execution reverted: Insufficient balance".to_string(),
                ));
            }
        }
        Ok(state.gas_estimate)
    }

    async fn send(&self, action: ContractAction, gas_limit: u64) -> CallResult<TxHash> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push((action, gas_limit));
        match self.snapshot().send_error {
            Some(err) => Err(err),
            None => Ok(TX_HASH),
        }
    }

    async fn receipt(&self, _tx_hash: TxHash) -> CallResult<Option<ReceiptSummary>> {
        let receipt = match self.snapshot().receipt {
            ReceiptMode::Never => None,
            ReceiptMode::Success { block } => Some(ReceiptSummary {
                success: true,
                block_number: Some(block),
                gas_used: 90_000,
            }),
            ReceiptMode::Reverted { block } => Some(ReceiptSummary {
                success: false,
                block_number: Some(block),
                gas_used: 90_000,
            }),
        };
        Ok(receipt)
    }

    async fn block_number(&self) -> CallResult<u64> {
        Ok(self.snapshot().current_block)
    }

    async fn latest_eth_price(&self) -> CallResult<U256> {
        self.snapshot()
            .eth_price
            .ok_or_else(|| CallError::Unavailable("price feed not responding".to_string()))
    }

    async fn stored_usd_value(&self) -> CallResult<U256> {
        self.snapshot()
            .stored_usd_value
            .ok_or_else(|| CallError::Unavailable("price feed not responding".to_string()))
    }

    async fn unlock_time(&self) -> CallResult<U256> {
        self.read(U256::from(1_700_000_000u64))
    }

    async fn owner(&self) -> CallResult<Address> {
        self.read(TEST_ADDRESS)
    }

    async fn upkeep_contract(&self) -> CallResult<Address> {
        self.read(Address::repeat_byte(0x11))
    }

    async fn last_winner(&self) -> CallResult<Address> {
        self.read(Address::ZERO)
    }

    async fn check_upkeep(&self, _check_data: Bytes) -> CallResult<UpkeepCheck> {
        self.read(UpkeepCheck {
            upkeep_needed: true,
            perform_data: Bytes::new(),
        })
    }

    async fn calculate_dynamic_reward(&self, base_amount: U256) -> CallResult<U256> {
        // 110% of the base.
        self.read(base_amount * U256::from(110u64) / U256::from(100u64))
    }
}

/// Binds every signer to the same mock.
pub struct MockBinder(pub Arc<MockRewardContract>);

impl ContractBinder for MockBinder {
    fn bind(&self, _signer: &SignerIdentity) -> ClaimResult<Arc<dyn RewardContract>> {
        Ok(self.0.clone())
    }
}

/// What the scripted wallet does when asked for accounts.
pub enum WalletScript {
    Unavailable,
    Rejected,
    Key(LocalKeyWallet),
}

/// Wallet connector with a fixed response.
pub struct ScriptedWallet {
    script: WalletScript,
    /// Network reported by the wallet; `None` follows the RPC endpoint.
    chain_id: Mutex<Option<u64>>,
    pub requests: AtomicUsize,
}

impl ScriptedWallet {
    pub fn new(script: WalletScript) -> Arc<Self> {
        Arc::new(Self {
            script,
            chain_id: Mutex::new(None),
            requests: AtomicUsize::new(0),
        })
    }

    /// Unlocked wallet that reports its own network.
    pub fn on_chain(chain_id: u64) -> Arc<Self> {
        Arc::new(Self {
            script: WalletScript::Key(LocalKeyWallet::from_private_key(TEST_PRIVATE_KEY).unwrap()),
            chain_id: Mutex::new(Some(chain_id)),
            requests: AtomicUsize::new(0),
        })
    }

    pub fn unlocked() -> Arc<Self> {
        Self::new(WalletScript::Key(
            LocalKeyWallet::from_private_key(TEST_PRIVATE_KEY).unwrap(),
        ))
    }

    /// The user picks another network in the wallet.
    pub fn switch_chain(&self, chain_id: u64) {
        *self.chain_id.lock().unwrap() = Some(chain_id);
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletConnector for ScriptedWallet {
    async fn request_accounts(&self) -> ClaimResult<Vec<Address>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            WalletScript::Unavailable => Err(ClaimError::WalletUnavailable(
                "no wallet extension detected".to_string(),
            )),
            WalletScript::Rejected => Err(ClaimError::UserRejected(
                "User rejected the request.".to_string(),
            )),
            WalletScript::Key(wallet) => wallet.request_accounts().await,
        }
    }

    async fn signer_for(&self, account: Address) -> ClaimResult<SignerIdentity> {
        match &self.script {
            WalletScript::Key(wallet) => wallet.signer_for(account).await,
            _ => Err(ClaimError::WalletUnavailable("no signer".to_string())),
        }
    }

    async fn chain_id(&self) -> ClaimResult<Option<u64>> {
        Ok(*self.chain_id.lock().unwrap())
    }
}

/// Fast confirmation polling for tests.
pub fn fast_policy(timeout: Duration) -> ConfirmationPolicy {
    ConfirmationPolicy {
        required_confirmations: 1,
        timeout,
        poll_interval: Duration::from_millis(10),
    }
}

pub fn test_settings(timeout: Duration) -> ClaimSettings {
    ClaimSettings {
        token_decimals: 18,
        gas_margin_percent: 120,
        confirmation: fast_policy(timeout),
        expected_chain_id: Some(TEST_CHAIN_ID),
    }
}
