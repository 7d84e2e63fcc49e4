//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ClientConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides the JSON-RPC endpoint.
pub const RPC_URL_ENV_VAR: &str = "REWARD_CLIENT_RPC_URL";
/// Overrides the expected chain id.
pub const CHAIN_ID_ENV_VAR: &str = "REWARD_CLIENT_CHAIN_ID";
/// Overrides the contract address.
pub const CONTRACT_ADDRESS_ENV_VAR: &str = "REWARD_CLIENT_CONTRACT_ADDRESS";
/// Overrides the injected wallet endpoint.
pub const WALLET_ENDPOINT_ENV_VAR: &str = "REWARD_CLIENT_WALLET_ENDPOINT";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, value } => {
                write!(f, "Invalid value '{}' in environment variable {}", value, var)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from an optional TOML file, apply environment
/// overrides, then validate.
///
/// A missing `path` means "defaults plus environment". Emits no log
/// events: it runs before the subscriber, whose settings it loads, exists.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => ClientConfig::default(),
    };

    let config = apply_env_overrides(config, |var| std::env::var(var).ok())?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply deployment-target overrides looked up through `lookup`.
pub fn apply_env_overrides<F>(mut config: ClientConfig, lookup: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(RPC_URL_ENV_VAR) {
        config.blockchain.rpc_url = url;
    }
    if let Some(raw) = lookup(CHAIN_ID_ENV_VAR) {
        config.blockchain.chain_id = raw.trim().parse().map_err(|_| ConfigError::Env {
            var: CHAIN_ID_ENV_VAR,
            value: raw.clone(),
        })?;
    }
    if let Some(address) = lookup(CONTRACT_ADDRESS_ENV_VAR) {
        config.contract.address = address;
    }
    if let Some(endpoint) = lookup(WALLET_ENDPOINT_ENV_VAR) {
        config.wallet.endpoint = Some(endpoint);
    }
    Ok(config)
}
