//! Contract binding: signer + contract address + interface.

use alloy::primitives::Address;
use std::sync::Arc;

use crate::blockchain::client::ChainClient;
use crate::blockchain::contract::{AlloyRewardContract, RewardContract};
use crate::blockchain::types::{ClaimError, ClaimResult};
use crate::blockchain::wallet::SignerIdentity;
use crate::claim::session::WalletSession;
use crate::config::schema::ClientConfig;

/// Turns a signer into a callable contract proxy.
pub trait ContractBinder: Send + Sync {
    fn bind(&self, signer: &SignerIdentity) -> ClaimResult<Arc<dyn RewardContract>>;
}

impl<F> ContractBinder for F
where
    F: Fn(&SignerIdentity) -> ClaimResult<Arc<dyn RewardContract>> + Send + Sync,
{
    fn bind(&self, signer: &SignerIdentity) -> ClaimResult<Arc<dyn RewardContract>> {
        self(signer)
    }
}

/// Binds the configured deployment over JSON-RPC.
#[derive(Debug, Clone)]
pub struct AlloyBinder {
    address: Address,
    chain: ChainClient,
}

impl AlloyBinder {
    pub fn new(address: Address, chain: ChainClient) -> Self {
        Self { address, chain }
    }

    pub fn from_config(config: &ClientConfig) -> ClaimResult<Self> {
        let address = config.contract.address.parse::<Address>().map_err(|e| {
            ClaimError::Config(format!(
                "Invalid contract address '{}': {}",
                config.contract.address, e
            ))
        })?;
        let chain = ChainClient::new(config.blockchain.clone())?;
        Ok(Self::new(address, chain))
    }

    pub fn chain(&self) -> &ChainClient {
        &self.chain
    }

    /// Proxy for view calls only; no wallet needed.
    pub fn read_only(&self) -> ClaimResult<Arc<dyn RewardContract>> {
        let contract = AlloyRewardContract::read_only(self.address, self.chain.clone())
            .map_err(|e| ClaimError::Config(e.to_string()))?;
        Ok(Arc::new(contract))
    }
}

impl ContractBinder for AlloyBinder {
    fn bind(&self, signer: &SignerIdentity) -> ClaimResult<Arc<dyn RewardContract>> {
        let contract = AlloyRewardContract::new(self.address, signer, self.chain.clone())
            .map_err(|e| ClaimError::Config(e.to_string()))?;
        Ok(Arc::new(contract))
    }
}

/// Immutable pairing of a signer address with its contract proxy.
///
/// Recreate it whenever the session's signer changes.
#[derive(Clone)]
pub struct ContractBinding {
    signer: Address,
    contract: Arc<dyn RewardContract>,
}

impl ContractBinding {
    /// Bind the session's signer. Fails with `NoSignerAvailable` before
    /// a wallet is connected. Performs no network calls.
    pub fn bind(session: &WalletSession, binder: &dyn ContractBinder) -> ClaimResult<Self> {
        let signer = session.signer()?;
        let contract = binder.bind(signer)?;
        tracing::debug!(
            signer = %signer.address(),
            contract = %contract.address(),
            "Contract bound"
        );
        Ok(Self {
            signer: signer.address(),
            contract,
        })
    }

    pub fn signer_address(&self) -> Address {
        self.signer
    }

    pub fn contract(&self) -> &dyn RewardContract {
        self.contract.as_ref()
    }
}

impl std::fmt::Debug for ContractBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractBinding")
            .field("signer", &self.signer)
            .field("contract", &self.contract.address())
            .finish()
    }
}
