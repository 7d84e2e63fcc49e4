//! Configuration validation.
//!
//! Serde handles syntax; this checks values that must make sense together
//! before any RPC connection is attempted. All problems are reported, not
//! just the first.

use std::fmt;

use alloy::primitives::Address;

use crate::config::schema::{ClientConfig, WalletMode};

/// Largest power of ten that fits in a U256.
const MAX_DECIMALS: u8 = 77;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// Human-readable explanation.
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let chain = &config.blockchain;
    if chain.rpc_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError::new(
            "blockchain.rpc_url",
            format!("invalid URL '{}'", chain.rpc_url),
        ));
    }
    for failover in &chain.failover_urls {
        if failover.parse::<url::Url>().is_err() {
            errors.push(ValidationError::new(
                "blockchain.failover_urls",
                format!("invalid URL '{}'", failover),
            ));
        }
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be > 0"));
    }
    if chain.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "blockchain.confirmation_timeout_secs",
            "must be > 0",
        ));
    }
    if chain.poll_interval_ms == 0 {
        errors.push(ValidationError::new("blockchain.poll_interval_ms", "must be > 0"));
    }

    let contract = &config.contract;
    if contract.address.is_empty() {
        errors.push(ValidationError::new(
            "contract.address",
            "must be set (config file or REWARD_CLIENT_CONTRACT_ADDRESS)",
        ));
    } else if contract.address.parse::<Address>().is_err() {
        errors.push(ValidationError::new(
            "contract.address",
            format!("invalid address '{}'", contract.address),
        ));
    }
    for (field, decimals) in [
        ("contract.token_decimals", contract.token_decimals),
        ("contract.price_decimals", contract.price_decimals),
        ("contract.usd_value_decimals", contract.usd_value_decimals),
    ] {
        if decimals > MAX_DECIMALS {
            errors.push(ValidationError::new(
                field,
                format!("{} exceeds maximum of {}", decimals, MAX_DECIMALS),
            ));
        }
    }
    if contract.gas_margin_percent < 100 {
        errors.push(ValidationError::new(
            "contract.gas_margin_percent",
            "must be at least 100",
        ));
    }

    if config.wallet.mode == WalletMode::Injected {
        match config.wallet.endpoint.as_deref() {
            Some(endpoint) if endpoint.parse::<url::Url>().is_err() => {
                errors.push(ValidationError::new(
                    "wallet.endpoint",
                    format!("invalid URL '{}'", endpoint),
                ));
            }
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
