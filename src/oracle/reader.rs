//! Price oracle reads.
//!
//! Independent of wallet and claim state: a read-only contract proxy is
//! enough.

use std::sync::Arc;

use crate::blockchain::contract::RewardContract;
use crate::blockchain::types::ClaimResult;
use crate::config::schema::ContractConfig;
use crate::oracle::types::{OracleSnapshot, PriceFeed, PriceReading};

/// Reads the contract's price feeds.
#[derive(Clone)]
pub struct OracleReader {
    contract: Arc<dyn RewardContract>,
    price_decimals: u8,
    usd_value_decimals: u8,
}

impl OracleReader {
    pub fn new(contract: Arc<dyn RewardContract>, config: &ContractConfig) -> Self {
        Self {
            contract,
            price_decimals: config.price_decimals,
            usd_value_decimals: config.usd_value_decimals,
        }
    }

    /// Latest externally fed ETH/USD price.
    pub async fn latest_eth_price(&self) -> ClaimResult<PriceReading> {
        let raw = self
            .contract
            .latest_eth_price()
            .await
            .map_err(|e| e.into_oracle_error())?;
        Ok(PriceReading {
            raw,
            decimals: self.price_decimals,
            feed: PriceFeed::EthUsd,
        })
    }

    /// Last USD value the contract stored.
    pub async fn stored_usd_value(&self) -> ClaimResult<PriceReading> {
        let raw = self
            .contract
            .stored_usd_value()
            .await
            .map_err(|e| e.into_oracle_error())?;
        Ok(PriceReading {
            raw,
            decimals: self.usd_value_decimals,
            feed: PriceFeed::StoredUsdValue,
        })
    }

    /// Read both feeds concurrently. One failing does not hide the other.
    pub async fn read_all(&self) -> OracleSnapshot {
        let (eth_price, stored_usd_value) =
            tokio::join!(self.latest_eth_price(), self.stored_usd_value());

        if let Err(e) = &eth_price {
            tracing::warn!(error = %e, "ETH price read failed");
        }
        if let Err(e) = &stored_usd_value {
            tracing::warn!(error = %e, "Stored USD value read failed");
        }

        OracleSnapshot {
            eth_price,
            stored_usd_value,
        }
    }
}
