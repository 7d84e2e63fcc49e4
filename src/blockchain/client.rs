//! Blockchain RPC client with timeout and failover.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoints (primary + failovers)
//! - Verify the endpoint serves the configured chain
//! - Query chain state (block number, receipts)
//! - Bound every RPC call with a timeout

use alloy::primitives::TxHash;
use alloy::providers::{Provider, ProviderBuilder};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{
    BlockchainConfig, CallError, CallResult, ChainId, ClaimError, ClaimResult, ReceiptSummary,
};
use crate::observability::metrics;

/// Read-only chain access with failover support.
#[derive(Clone)]
pub struct ChainClient {
    /// List of providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Configuration.
    config: BlockchainConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl ChainClient {
    /// Create a new chain client.
    ///
    /// No network traffic happens here; call [`ChainClient::verify_chain_id`]
    /// before sending transactions.
    pub fn new(config: BlockchainConfig) -> ClaimResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            ClaimError::Config(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)) as Arc<dyn Provider + Send + Sync>);

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        tracing::debug!(
            rpc_url = %config.rpc_url,
            failovers = providers.len() - 1,
            chain_id = config.chain_id,
            "Chain client created"
        );

        Ok(Self {
            providers,
            config,
            timeout_duration,
        })
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> ClaimResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(ClaimError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC. Records endpoint health either way.
    pub async fn get_chain_id(&self) -> ClaimResult<ChainId> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_chain_id();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => {
                    metrics::record_rpc_health(&self.config.rpc_url, true);
                    return Ok(ChainId(result));
                }
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        metrics::record_rpc_health(&self.config.rpc_url, false);
        Err(ClaimError::OracleOrContractUnavailable(
            "All RPC providers failed".to_string(),
        ))
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> CallResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_block_number();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(CallError::Unavailable(
            "All providers failed to get block number".to_string(),
        ))
    }

    /// Get a transaction receipt by hash.
    ///
    /// `Ok(None)` means the transaction is not mined yet.
    pub async fn get_receipt(&self, tx_hash: TxHash) -> CallResult<Option<ReceiptSummary>> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_transaction_receipt(tx_hash);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(receipt)) => {
                    return Ok(receipt.map(|r| ReceiptSummary {
                        success: r.status(),
                        block_number: r.block_number,
                        gas_used: r.gas_used,
                    }))
                }
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(CallError::Unavailable(
            "All providers failed to get receipt".to_string(),
        ))
    }

    /// Run `fut` under the configured RPC timeout.
    pub async fn with_timeout<T, F>(&self, method: &'static str, fut: F) -> CallResult<T>
    where
        F: Future<Output = CallResult<T>>,
    {
        let result = match timeout(self.timeout_duration, fut).await {
            Ok(result) => result,
            Err(_) => Err(CallError::Unavailable(format!(
                "{} timed out after {}s",
                method, self.config.rpc_timeout_secs
            ))),
        };
        metrics::record_contract_call(method, result.is_ok());
        result
    }

    /// Get the configuration.
    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
