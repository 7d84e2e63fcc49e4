//! Wallet connection and signing identities.
//!
//! Two connectors are provided:
//! - [`InjectedWallet`] talks to a wallet's JSON-RPC endpoint and lets the
//!   wallet prompt the user and sign.
//! - [`LocalKeyWallet`] signs with a private key read from the environment.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;

use crate::blockchain::types::{CallError, ClaimError, ClaimResult};
use crate::config::schema::{WalletConfig, WalletMode};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "REWARD_CLIENT_PRIVATE_KEY";

/// How transactions get authorized.
#[derive(Clone)]
pub enum SignerBackend {
    /// Signed in-process.
    Local(PrivateKeySigner),
    /// Sent unsigned to a wallet endpoint that signs after user approval.
    Injected { endpoint: url::Url },
}

/// An address plus the capability to authorize transactions from it.
#[derive(Clone)]
pub struct SignerIdentity {
    address: Address,
    backend: SignerBackend,
}

impl SignerIdentity {
    /// Identity backed by an in-process key.
    pub fn local(signer: PrivateKeySigner) -> Self {
        Self {
            address: signer.address(),
            backend: SignerBackend::Local(signer),
        }
    }

    /// Identity backed by a wallet endpoint.
    pub fn injected(address: Address, endpoint: url::Url) -> Self {
        Self {
            address,
            backend: SignerBackend::Injected { endpoint },
        }
    }

    /// The signer's address.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn backend(&self) -> &SignerBackend {
        &self.backend
    }

    /// Build a provider that authorizes transactions as this identity.
    ///
    /// Local keys sign and send through `rpc_url`; injected wallets receive
    /// every request themselves. No network traffic happens here.
    pub fn provider(&self, rpc_url: url::Url) -> DynProvider {
        match &self.backend {
            SignerBackend::Local(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer.clone()))
                .connect_http(rpc_url)
                .erased(),
            SignerBackend::Injected { endpoint } => {
                ProviderBuilder::new().connect_http(endpoint.clone()).erased()
            }
        }
    }
}

impl std::fmt::Debug for SignerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match &self.backend {
            SignerBackend::Local(_) => "local",
            SignerBackend::Injected { .. } => "injected",
        };
        f.debug_struct("SignerIdentity")
            .field("address", &self.address)
            .field("backend", &backend)
            .finish()
    }
}

/// Source of signing identities.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Ask the wallet for authorized accounts. May prompt the user.
    async fn request_accounts(&self) -> ClaimResult<Vec<Address>>;

    /// Signing identity for an account returned by `request_accounts`.
    async fn signer_for(&self, account: Address) -> ClaimResult<SignerIdentity>;

    /// Chain the wallet will sign for, when it picks its own network.
    ///
    /// `None` means the wallet signs for whatever chain the RPC endpoint serves.
    async fn chain_id(&self) -> ClaimResult<Option<u64>> {
        Ok(None)
    }
}

/// Fail with `ChainMismatch` if the wallet is on a different network.
pub async fn ensure_chain(connector: &dyn WalletConnector, expected: u64) -> ClaimResult<()> {
    match connector.chain_id().await? {
        Some(actual) if actual != expected => {
            tracing::error!(expected, actual, "Wallet is on the wrong network");
            Err(ClaimError::ChainMismatch { expected, actual })
        }
        _ => Ok(()),
    }
}

/// Obtain a signer bound to the first authorized account.
pub async fn connect(connector: &dyn WalletConnector) -> ClaimResult<SignerIdentity> {
    let accounts = connector.request_accounts().await?;
    let account = accounts.first().copied().ok_or_else(|| {
        ClaimError::UserRejected("wallet returned no authorized accounts".to_string())
    })?;
    let signer = connector.signer_for(account).await?;
    tracing::info!(address = %signer.address(), "Wallet connected");
    Ok(signer)
}

/// Build the connector selected in configuration.
pub fn connector_from_config(config: &WalletConfig) -> Box<dyn WalletConnector> {
    match config.mode {
        WalletMode::Injected => Box::new(InjectedWallet::new(config.endpoint.clone())),
        WalletMode::LocalKey => Box::new(LocalKeyWallet::from_env()),
    }
}

/// Wallet reached over JSON-RPC (EIP-1193 semantics).
#[derive(Debug, Clone)]
pub struct InjectedWallet {
    endpoint: Option<String>,
}

impl InjectedWallet {
    pub fn new(endpoint: Option<String>) -> Self {
        Self { endpoint }
    }

    fn endpoint_url(&self) -> ClaimResult<url::Url> {
        let endpoint = self.endpoint.as_deref().ok_or_else(|| {
            ClaimError::WalletUnavailable("no wallet endpoint configured".to_string())
        })?;
        endpoint.parse().map_err(|e| {
            ClaimError::WalletUnavailable(format!("invalid wallet endpoint '{}': {}", endpoint, e))
        })
    }
}

#[async_trait]
impl WalletConnector for InjectedWallet {
    async fn request_accounts(&self) -> ClaimResult<Vec<Address>> {
        let endpoint = self.endpoint_url()?;
        let provider = ProviderBuilder::new().connect_http(endpoint.clone());

        tracing::debug!(endpoint = %endpoint, "Requesting wallet accounts");
        let accounts: Vec<Address> = provider
            .client()
            .request_noparams("eth_requestAccounts")
            .await
            .map_err(|e| match CallError::from_transport(&e) {
                CallError::Rejected(reason) => ClaimError::UserRejected(reason),
                other => ClaimError::WalletUnavailable(other.to_string()),
            })?;

        Ok(accounts)
    }

    async fn signer_for(&self, account: Address) -> ClaimResult<SignerIdentity> {
        Ok(SignerIdentity::injected(account, self.endpoint_url()?))
    }

    /// `eth_chainId` against the wallet, which may be switched by the user at any time.
    async fn chain_id(&self) -> ClaimResult<Option<u64>> {
        let endpoint = self.endpoint_url()?;
        let chain_id = ProviderBuilder::new()
            .connect_http(endpoint)
            .get_chain_id()
            .await
            .map_err(|e| ClaimError::WalletUnavailable(CallError::from_transport(&e).to_string()))?;
        Ok(Some(chain_id))
    }
}

/// Wallet backed by a private key.
#[derive(Clone)]
pub struct LocalKeyWallet {
    key: Result<PrivateKeySigner, String>,
}

impl LocalKeyWallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    ///
    /// # Security
    /// The private key is parsed and stored securely. It is never logged.
    pub fn from_private_key(private_key_hex: &str) -> ClaimResult<Self> {
        let key_hex = private_key_hex
            .trim()
            .strip_prefix("0x")
            .unwrap_or(private_key_hex.trim());

        let signer: PrivateKeySigner = key_hex.parse().map_err(|e| {
            ClaimError::WalletUnavailable(format!("Invalid private key format: {}", e))
        })?;

        Ok(Self { key: Ok(signer) })
    }

    /// Load wallet from environment variable.
    ///
    /// Reads `REWARD_CLIENT_PRIVATE_KEY`. A missing or malformed key is
    /// reported when accounts are requested, like an absent wallet.
    pub fn from_env() -> Self {
        match std::env::var(PRIVATE_KEY_ENV_VAR) {
            Ok(private_key) => Self::from_private_key(&private_key).unwrap_or_else(|e| Self {
                key: Err(e.to_string()),
            }),
            Err(_) => Self {
                key: Err(format!("Environment variable {} not set", PRIVATE_KEY_ENV_VAR)),
            },
        }
    }

    fn signer(&self) -> ClaimResult<&PrivateKeySigner> {
        self.key
            .as_ref()
            .map_err(|reason| ClaimError::WalletUnavailable(reason.clone()))
    }
}

#[async_trait]
impl WalletConnector for LocalKeyWallet {
    async fn request_accounts(&self) -> ClaimResult<Vec<Address>> {
        Ok(vec![self.signer()?.address()])
    }

    async fn signer_for(&self, account: Address) -> ClaimResult<SignerIdentity> {
        let signer = self.signer()?;
        if signer.address() != account {
            return Err(ClaimError::WalletUnavailable(format!(
                "account {} is not controlled by this key",
                account
            )));
        }
        Ok(SignerIdentity::local(signer.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[tokio::test]
    async fn test_local_wallet_connects() {
        let wallet = LocalKeyWallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let signer = connect(&wallet).await.unwrap();
        assert_eq!(
            signer.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
        assert!(matches!(signer.backend(), SignerBackend::Local(_)));
    }

    #[test]
    fn test_wallet_with_0x_prefix() {
        let wallet = LocalKeyWallet::from_private_key(&format!("0x{}", TEST_PRIVATE_KEY)).unwrap();
        assert!(wallet.signer().is_ok());
    }

    #[test]
    fn test_invalid_private_key() {
        let result = LocalKeyWallet::from_private_key("invalid_key");
        assert!(matches!(result, Err(ClaimError::WalletUnavailable(_))));
    }

    #[tokio::test]
    async fn test_foreign_account_refused() {
        let wallet = LocalKeyWallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let err = wallet.signer_for(Address::ZERO).await.unwrap_err();
        assert!(matches!(err, ClaimError::WalletUnavailable(_)));
    }

    #[tokio::test]
    async fn test_injected_without_endpoint_is_unavailable() {
        let wallet = InjectedWallet::new(None);
        let err = connect(&wallet).await.unwrap_err();
        assert!(matches!(err, ClaimError::WalletUnavailable(_)));
    }

    #[tokio::test]
    async fn test_injected_unreachable_is_unavailable() {
        let wallet = InjectedWallet::new(Some("http://127.0.0.1:1".to_string()));
        let err = connect(&wallet).await.unwrap_err();
        assert!(matches!(err, ClaimError::WalletUnavailable(_)));
    }

    #[tokio::test]
    async fn test_local_wallet_follows_rpc_chain() {
        let wallet = LocalKeyWallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(wallet.chain_id().await.unwrap(), None);
        assert!(ensure_chain(&wallet, 11155111).await.is_ok());
    }

    #[tokio::test]
    async fn test_injected_chain_unreachable_is_unavailable() {
        let wallet = InjectedWallet::new(Some("http://127.0.0.1:1".to_string()));
        let err = ensure_chain(&wallet, 11155111).await.unwrap_err();
        assert!(matches!(err, ClaimError::WalletUnavailable(_)));
    }

    #[test]
    fn test_debug_hides_key() {
        let wallet = LocalKeyWallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let identity = SignerIdentity::local(wallet.signer().unwrap().clone());
        let debug = format!("{:?}", identity);
        assert!(!debug.contains(TEST_PRIVATE_KEY));
        assert!(debug.contains("local"));
    }
}
