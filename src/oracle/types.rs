//! Price oracle types.

use alloy::primitives::U256;
use serde::Serialize;
use std::fmt;

use crate::blockchain::types::ClaimResult;
use crate::units;

/// Which on-chain value a reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceFeed {
    /// `getLatestETHPrice()`, the external ETH/USD feed.
    EthUsd,
    /// `storedUSDValue()`, the contract's last derived value.
    StoredUsdValue,
}

impl PriceFeed {
    pub fn label(&self) -> &'static str {
        match self {
            PriceFeed::EthUsd => "ETH/USD price",
            PriceFeed::StoredUsdValue => "Stored USD value",
        }
    }
}

/// A point-in-time read of a fixed-point value. Not cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceReading {
    /// Raw on-chain integer.
    pub raw: U256,
    /// Power of ten the raw value is scaled by.
    pub decimals: u8,
    pub feed: PriceFeed,
}

impl PriceReading {
    /// `raw / 10^decimals` with every fractional digit kept.
    pub fn to_decimal_string(&self) -> String {
        units::format_amount(self.raw, self.decimals)
    }
}

impl fmt::Display for PriceReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

/// Both feeds read at (roughly) the same moment.
///
/// The two values are not guaranteed to be consistent with each other: the
/// stored value may derive from an older price than `eth_price`.
#[derive(Debug)]
pub struct OracleSnapshot {
    pub eth_price: ClaimResult<PriceReading>,
    pub stored_usd_value: ClaimResult<PriceReading>,
}

/// Render a read for display; failures show as "unavailable", never zero.
pub fn render(reading: &ClaimResult<PriceReading>) -> String {
    match reading {
        Ok(reading) => reading.to_decimal_string(),
        Err(_) => "unavailable".to_string(),
    }
}
