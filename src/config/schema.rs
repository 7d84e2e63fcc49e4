//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the reward client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the reward client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Chain connection settings.
    pub blockchain: BlockchainConfig,

    /// Reward contract deployment settings.
    pub contract: ContractConfig,

    /// Wallet connector settings.
    pub wallet: WalletConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Blockchain connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 11155111 for Sepolia).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations required before a claim counts as confirmed.
    pub confirmation_blocks: u32,

    /// Upper bound on the confirmation wait in seconds.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 11155111,
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            confirmation_timeout_secs: 120,
            poll_interval_ms: 2000,
        }
    }
}

/// Reward contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Deployed contract address (hex, 0x-prefixed).
    pub address: String,

    /// Display symbol of the reward token.
    pub token_symbol: String,

    /// Fixed-point scale of token amounts.
    pub token_decimals: u8,

    /// Fixed-point scale of `getLatestETHPrice`.
    pub price_decimals: u8,

    /// Fixed-point scale of `storedUSDValue`.
    pub usd_value_decimals: u8,

    /// Gas limit as a percentage of the estimate (120 = 20% headroom).
    pub gas_margin_percent: u64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            token_symbol: "RWT".to_string(),
            token_decimals: 18,
            price_decimals: 8,
            usd_value_decimals: 18,
            gas_margin_percent: 120,
        }
    }
}

/// How the signing identity is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletMode {
    /// A JSON-RPC wallet that prompts the user (`eth_requestAccounts`).
    Injected,
    /// A private key read from the environment.
    LocalKey,
}

/// Wallet connector configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Connector to use.
    pub mode: WalletMode,

    /// Wallet JSON-RPC endpoint for `injected` mode.
    pub endpoint: Option<String>,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            mode: WalletMode::Injected,
            endpoint: Some("http://127.0.0.1:1248".to_string()),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
