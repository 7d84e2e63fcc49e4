//! Reward contract interface and its alloy-backed implementation.
//!
//! [`RewardContract`] is the seam between the claim pipeline and the chain:
//! the pipeline only sees classified [`CallError`]s, never transport types.

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::sol;
use async_trait::async_trait;

use crate::blockchain::client::ChainClient;
use crate::blockchain::types::{CallError, CallResult, ReceiptSummary};
use crate::blockchain::wallet::SignerIdentity;
use crate::observability::metrics;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface Zero2Hero {
        function isEligibleForReward(address user) external view returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function claimReward(uint256 amount) external;

        function getLatestETHPrice() external view returns (uint256);
        function storedUSDValue() external view returns (uint256);
        function updatePrices() external;

        function getUnlockTime() external view returns (uint256);
        function getOwner() external view returns (address);
        function getUpkeepContract() external view returns (address);
        function lastWinner() external view returns (address);
        function runLottery() external;
        function calculateDynamicReward(uint256 baseAmount) external view returns (uint256);
        function checkUpkeep(bytes checkData) external returns (bool upkeepNeeded, bytes performData);
    }
}

/// A state-changing contract call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractAction {
    /// `claimReward(amount)`, amount in scaled token units.
    Claim(U256),
    /// `runLottery()`.
    RunLottery,
    /// `updatePrices()`.
    UpdatePrices,
}

impl ContractAction {
    /// Solidity method name, used for logs and metrics.
    pub fn method(&self) -> &'static str {
        match self {
            ContractAction::Claim(_) => "claimReward",
            ContractAction::RunLottery => "runLottery",
            ContractAction::UpdatePrices => "updatePrices",
        }
    }
}

/// Result of `checkUpkeep`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpkeepCheck {
    pub upkeep_needed: bool,
    pub perform_data: Bytes,
}

/// Callable proxy over the deployed reward contract.
#[async_trait]
pub trait RewardContract: Send + Sync {
    /// Address of the deployed contract.
    fn address(&self) -> Address;

    async fn is_eligible_for_reward(&self, account: Address) -> CallResult<bool>;
    async fn balance_of(&self, account: Address) -> CallResult<U256>;

    /// Simulate `action` and return the gas it would use.
    async fn estimate_gas(&self, action: ContractAction) -> CallResult<u64>;

    /// Broadcast `action` with an explicit gas limit.
    async fn send(&self, action: ContractAction, gas_limit: u64) -> CallResult<TxHash>;

    /// `Ok(None)` while the transaction is not mined.
    async fn receipt(&self, tx_hash: TxHash) -> CallResult<Option<ReceiptSummary>>;
    async fn block_number(&self) -> CallResult<u64>;

    /// Latest ETH/USD price, 8-decimal fixed point.
    async fn latest_eth_price(&self) -> CallResult<U256>;
    /// Last stored derived USD value, 18-decimal fixed point.
    async fn stored_usd_value(&self) -> CallResult<U256>;

    async fn unlock_time(&self) -> CallResult<U256>;
    async fn owner(&self) -> CallResult<Address>;
    async fn upkeep_contract(&self) -> CallResult<Address>;
    async fn last_winner(&self) -> CallResult<Address>;
    async fn check_upkeep(&self, check_data: Bytes) -> CallResult<UpkeepCheck>;
    async fn calculate_dynamic_reward(&self, base_amount: U256) -> CallResult<U256>;
}

fn classify(err: alloy::contract::Error) -> CallError {
    match err {
        alloy::contract::Error::TransportError(e) => CallError::from_transport(&e),
        other => CallError::Unavailable(other.to_string()),
    }
}

/// [`RewardContract`] over JSON-RPC, authorized by a [`SignerIdentity`].
pub struct AlloyRewardContract {
    instance: Zero2Hero::Zero2HeroInstance<DynProvider>,
    chain: ChainClient,
    from: Address,
}

impl AlloyRewardContract {
    /// Bind `address` to `signer`. Pure construction, no network call.
    pub fn new(address: Address, signer: &SignerIdentity, chain: ChainClient) -> CallResult<Self> {
        let rpc_url: url::Url = chain
            .config()
            .rpc_url
            .parse()
            .map_err(|e| CallError::Unavailable(format!("Invalid RPC URL: {}", e)))?;
        let provider = signer.provider(rpc_url);

        Ok(Self {
            instance: Zero2Hero::new(address, provider),
            chain,
            from: signer.address(),
        })
    }

    /// Proxy for view calls only. Transactions sent through it are unsigned
    /// and will be refused by a regular node.
    pub fn read_only(address: Address, chain: ChainClient) -> CallResult<Self> {
        let rpc_url: url::Url = chain
            .config()
            .rpc_url
            .parse()
            .map_err(|e| CallError::Unavailable(format!("Invalid RPC URL: {}", e)))?;
        let provider = ProviderBuilder::new().connect_http(rpc_url).erased();

        Ok(Self {
            instance: Zero2Hero::new(address, provider),
            chain,
            from: Address::ZERO,
        })
    }
}

#[async_trait]
impl RewardContract for AlloyRewardContract {
    fn address(&self) -> Address {
        *self.instance.address()
    }

    async fn is_eligible_for_reward(&self, account: Address) -> CallResult<bool> {
        self.chain
            .with_timeout("isEligibleForReward", async {
                self.instance
                    .isEligibleForReward(account)
                    .call()
                    .await
                    .map_err(classify)
            })
            .await
    }

    async fn balance_of(&self, account: Address) -> CallResult<U256> {
        self.chain
            .with_timeout("balanceOf", async {
                self.instance.balanceOf(account).call().await.map_err(classify)
            })
            .await
    }

    async fn estimate_gas(&self, action: ContractAction) -> CallResult<u64> {
        let from = self.from;
        self.chain
            .with_timeout(action.method(), async {
                let estimate = match action {
                    ContractAction::Claim(amount) => {
                        self.instance.claimReward(amount).from(from).estimate_gas().await
                    }
                    ContractAction::RunLottery => {
                        self.instance.runLottery().from(from).estimate_gas().await
                    }
                    ContractAction::UpdatePrices => {
                        self.instance.updatePrices().from(from).estimate_gas().await
                    }
                };
                estimate.map_err(classify)
            })
            .await
    }

    async fn send(&self, action: ContractAction, gas_limit: u64) -> CallResult<TxHash> {
        let from = self.from;
        // Not bounded by the RPC timeout: an injected wallet waits for the
        // user, and a send abandoned locally may still be broadcast.
        let pending = match action {
            ContractAction::Claim(amount) => {
                self.instance.claimReward(amount).from(from).gas(gas_limit).send().await
            }
            ContractAction::RunLottery => {
                self.instance.runLottery().from(from).gas(gas_limit).send().await
            }
            ContractAction::UpdatePrices => {
                self.instance.updatePrices().from(from).gas(gas_limit).send().await
            }
        };
        metrics::record_contract_call(action.method(), pending.is_ok());

        let pending = pending.map_err(classify)?;
        Ok(*pending.tx_hash())
    }

    async fn receipt(&self, tx_hash: TxHash) -> CallResult<Option<ReceiptSummary>> {
        self.chain.get_receipt(tx_hash).await
    }

    async fn block_number(&self) -> CallResult<u64> {
        self.chain.get_block_number().await
    }

    async fn latest_eth_price(&self) -> CallResult<U256> {
        self.chain
            .with_timeout("getLatestETHPrice", async {
                self.instance.getLatestETHPrice().call().await.map_err(classify)
            })
            .await
    }

    async fn stored_usd_value(&self) -> CallResult<U256> {
        self.chain
            .with_timeout("storedUSDValue", async {
                self.instance.storedUSDValue().call().await.map_err(classify)
            })
            .await
    }

    async fn unlock_time(&self) -> CallResult<U256> {
        self.chain
            .with_timeout("getUnlockTime", async {
                self.instance.getUnlockTime().call().await.map_err(classify)
            })
            .await
    }

    async fn owner(&self) -> CallResult<Address> {
        self.chain
            .with_timeout("getOwner", async {
                self.instance.getOwner().call().await.map_err(classify)
            })
            .await
    }

    async fn upkeep_contract(&self) -> CallResult<Address> {
        self.chain
            .with_timeout("getUpkeepContract", async {
                self.instance.getUpkeepContract().call().await.map_err(classify)
            })
            .await
    }

    async fn last_winner(&self) -> CallResult<Address> {
        self.chain
            .with_timeout("lastWinner", async {
                self.instance.lastWinner().call().await.map_err(classify)
            })
            .await
    }

    async fn check_upkeep(&self, check_data: Bytes) -> CallResult<UpkeepCheck> {
        self.chain
            .with_timeout("checkUpkeep", async {
                let ret = self
                    .instance
                    .checkUpkeep(check_data)
                    .call()
                    .await
                    .map_err(classify)?;
                Ok(UpkeepCheck {
                    upkeep_needed: ret.upkeepNeeded,
                    perform_data: ret.performData,
                })
            })
            .await
    }

    async fn calculate_dynamic_reward(&self, base_amount: U256) -> CallResult<U256> {
        self.chain
            .with_timeout("calculateDynamicReward", async {
                self.instance
                    .calculateDynamicReward(base_amount)
                    .call()
                    .await
                    .map_err(classify)
            })
            .await
    }
}
