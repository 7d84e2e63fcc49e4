//! Read-only contract state.

use alloy::primitives::{Address, Bytes, U256};
use serde::Serialize;
use std::sync::Arc;

use crate::blockchain::contract::{RewardContract, UpkeepCheck};
use crate::blockchain::types::{ClaimResult, TokenAmount};
use crate::config::schema::ContractConfig;
use crate::units;

/// Contract state useful to operators.
#[derive(Debug, Clone, Serialize)]
pub struct ContractInfo {
    pub address: Address,
    pub owner: Address,
    pub upkeep_contract: Address,
    pub last_winner: Address,
    /// Unix seconds.
    pub unlock_time: U256,
    pub upkeep_needed: bool,
}

/// View calls that do not need a wallet.
#[derive(Clone)]
pub struct ContractQueries {
    contract: Arc<dyn RewardContract>,
    token_symbol: String,
    token_decimals: u8,
}

impl ContractQueries {
    pub fn new(contract: Arc<dyn RewardContract>, config: &ContractConfig) -> Self {
        Self {
            contract,
            token_symbol: config.token_symbol.clone(),
            token_decimals: config.token_decimals,
        }
    }

    pub async fn unlock_time(&self) -> ClaimResult<U256> {
        self.contract
            .unlock_time()
            .await
            .map_err(|e| e.into_contract_error())
    }

    pub async fn owner(&self) -> ClaimResult<Address> {
        self.contract.owner().await.map_err(|e| e.into_contract_error())
    }

    pub async fn upkeep_contract(&self) -> ClaimResult<Address> {
        self.contract
            .upkeep_contract()
            .await
            .map_err(|e| e.into_contract_error())
    }

    pub async fn last_winner(&self) -> ClaimResult<Address> {
        self.contract
            .last_winner()
            .await
            .map_err(|e| e.into_contract_error())
    }

    /// Simulate the automation check with empty check data.
    pub async fn check_upkeep(&self) -> ClaimResult<UpkeepCheck> {
        self.contract
            .check_upkeep(Bytes::new())
            .await
            .map_err(|e| e.into_contract_error())
    }

    /// Whether the automation upkeep would run now.
    pub async fn upkeep_needed(&self) -> ClaimResult<bool> {
        Ok(self.check_upkeep().await?.upkeep_needed)
    }

    /// Reward the contract would pay for a base amount given in whole tokens.
    pub async fn dynamic_reward(&self, base_amount: &str) -> ClaimResult<TokenAmount> {
        let base = units::parse_amount(base_amount, self.token_decimals)?;
        let raw = self
            .contract
            .calculate_dynamic_reward(base)
            .await
            .map_err(|e| e.into_contract_error())?;
        Ok(self.token_amount(raw))
    }

    pub async fn token_balance(&self, account: Address) -> ClaimResult<TokenAmount> {
        let raw = self
            .contract
            .balance_of(account)
            .await
            .map_err(|e| e.into_contract_error())?;
        Ok(self.token_amount(raw))
    }

    /// Every field in one round of concurrent calls.
    pub async fn info(&self) -> ClaimResult<ContractInfo> {
        let (owner, upkeep_contract, last_winner, unlock_time, upkeep_needed) = tokio::try_join!(
            self.owner(),
            self.upkeep_contract(),
            self.last_winner(),
            self.unlock_time(),
            self.upkeep_needed(),
        )?;

        Ok(ContractInfo {
            address: self.contract.address(),
            owner,
            upkeep_contract,
            last_winner,
            unlock_time,
            upkeep_needed,
        })
    }

    fn token_amount(&self, raw: U256) -> TokenAmount {
        TokenAmount {
            raw,
            formatted: units::format_amount(raw, self.token_decimals),
            symbol: self.token_symbol.clone(),
        }
    }
}
