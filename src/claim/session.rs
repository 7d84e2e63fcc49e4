//! Wallet session lifecycle.

use crate::blockchain::types::{ClaimError, ClaimResult};
use crate::blockchain::wallet::{self, SignerIdentity, WalletConnector};

/// Holds the connected signer, if any.
///
/// Created empty, filled by [`WalletSession::connect`], emptied by
/// [`WalletSession::disconnect`]. Bindings made from a previous signer
/// must not be reused after the signer changes.
#[derive(Debug, Default)]
pub struct WalletSession {
    signer: Option<SignerIdentity>,
}

impl WalletSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request accounts from `connector` and keep the first one.
    ///
    /// On failure the previous signer, if any, is dropped.
    pub async fn connect(&mut self, connector: &dyn WalletConnector) -> ClaimResult<&SignerIdentity> {
        self.signer = None;
        let signer = wallet::connect(connector).await?;
        Ok(&*self.signer.insert(signer))
    }

    pub fn disconnect(&mut self) {
        if let Some(signer) = self.signer.take() {
            tracing::info!(address = %signer.address(), "Wallet disconnected");
        }
    }

    /// The connected signer.
    pub fn signer(&self) -> ClaimResult<&SignerIdentity> {
        self.signer.as_ref().ok_or(ClaimError::NoSignerAvailable)
    }

    pub fn is_connected(&self) -> bool {
        self.signer.is_some()
    }
}
