//! End-to-end claim attempt.
//!
//! ```text
//! Idle → Connecting → Bound → Validating → Estimating → Submitting
//!                                                          ↓
//!                                   Confirmed | Reverted | TimedOut → Idle
//! ```
//!
//! Every call to [`ClaimFlow::claim`] is a fresh attempt. Only the
//! session's signer carries over (skipping `Connecting`); the wallet's
//! network, the binding, validation and gas budget are always rechecked.
//! An abandon signal sent before the attempt started is discarded; one sent
//! before broadcast cancels it with nothing sent.

use alloy::primitives::U256;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::types::{ClaimError, ClaimResult};
use crate::blockchain::wallet::{self, WalletConnector};
use crate::claim::binding::{ContractBinder, ContractBinding};
use crate::claim::gas::{self, DEFAULT_GAS_MARGIN_PERCENT};
use crate::claim::session::WalletSession;
use crate::claim::submitter::{self, ConfirmationPolicy};
use crate::claim::types::{ClaimOutcome, ClaimState};
use crate::claim::validator::{self, ClaimRequest};
use crate::config::schema::ClientConfig;
use crate::lifecycle::abandon::drain;
use crate::observability::metrics;
use crate::units;

/// Tunables for a claim attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimSettings {
    pub token_decimals: u8,
    pub gas_margin_percent: u64,
    pub confirmation: ConfirmationPolicy,
    /// Network the wallet must be on; `None` skips the check.
    pub expected_chain_id: Option<u64>,
}

impl ClaimSettings {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            token_decimals: config.contract.token_decimals,
            gas_margin_percent: config.contract.gas_margin_percent,
            confirmation: ConfirmationPolicy::from_config(&config.blockchain),
            expected_chain_id: Some(config.blockchain.chain_id),
        }
    }
}

impl Default for ClaimSettings {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

/// Drives claim attempts and publishes their state.
pub struct ClaimFlow {
    connector: Arc<dyn WalletConnector>,
    binder: Arc<dyn ContractBinder>,
    settings: ClaimSettings,
    state: watch::Sender<ClaimState>,
}

impl ClaimFlow {
    pub fn new(
        connector: Arc<dyn WalletConnector>,
        binder: Arc<dyn ContractBinder>,
        settings: ClaimSettings,
    ) -> Self {
        let (state, _) = watch::channel(ClaimState::Idle);
        Self {
            connector,
            binder,
            settings,
            state,
        }
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<ClaimState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ClaimState {
        *self.state.borrow()
    }

    /// Claim a decimal amount (e.g. `"2.5"` tokens).
    pub async fn claim(
        &self,
        session: &mut WalletSession,
        amount: &str,
        abandon: &mut broadcast::Receiver<()>,
    ) -> ClaimResult<ClaimOutcome> {
        let amount = units::parse_amount(amount, self.settings.token_decimals)?;
        self.claim_scaled(session, amount, abandon).await
    }

    /// Claim an amount already scaled to token units.
    pub async fn claim_scaled(
        &self,
        session: &mut WalletSession,
        amount: U256,
        abandon: &mut broadcast::Receiver<()>,
    ) -> ClaimResult<ClaimOutcome> {
        let attempt_id = Uuid::new_v4();
        let span = tracing::info_span!("claim", attempt_id = %attempt_id, amount = %amount);

        let result = self.attempt(session, amount, abandon).instrument(span).await;

        let outcome = match &result {
            Ok(ClaimOutcome::Confirmed { .. }) => {
                self.transition(ClaimState::Confirmed);
                "confirmed"
            }
            Ok(ClaimOutcome::Abandoned { .. }) => "abandoned",
            Err(ClaimError::TransactionReverted { .. }) => {
                self.transition(ClaimState::Reverted);
                "reverted"
            }
            Err(ClaimError::TransactionTimeout { .. }) => {
                self.transition(ClaimState::TimedOut);
                "timed_out"
            }
            Err(e) => e.kind(),
        };
        metrics::record_claim_outcome(outcome);
        self.transition(ClaimState::Idle);

        if let Err(e) = &result {
            tracing::warn!(attempt_id = %attempt_id, error = %e, "Claim attempt failed");
        }
        result
    }

    async fn attempt(
        &self,
        session: &mut WalletSession,
        amount: U256,
        abandon: &mut broadcast::Receiver<()>,
    ) -> ClaimResult<ClaimOutcome> {
        drain(abandon);

        if !session.is_connected() {
            self.transition(ClaimState::Connecting);
            session.connect(self.connector.as_ref()).await?;
        }
        if let Some(expected) = self.settings.expected_chain_id {
            wallet::ensure_chain(self.connector.as_ref(), expected).await?;
        }

        let binding = ContractBinding::bind(session, self.binder.as_ref())?;
        self.transition(ClaimState::Bound);

        self.transition(ClaimState::Validating);
        let request = ClaimRequest::new(&binding, amount)?;
        let claim = validator::validate(&binding, request).await?;

        self.transition(ClaimState::Estimating);
        let budget = gas::estimate_claim(&binding, &claim, self.margin()).await?;

        self.transition(ClaimState::Submitting);
        submitter::submit_claim(&binding, claim, budget, self.settings.confirmation, abandon).await
    }

    fn margin(&self) -> u64 {
        if self.settings.gas_margin_percent == 0 {
            DEFAULT_GAS_MARGIN_PERCENT
        } else {
            self.settings.gas_margin_percent
        }
    }

    fn transition(&self, next: ClaimState) {
        let previous = self.state.send_replace(next);
        tracing::debug!(from = %previous, to = %next, "Claim state");
    }
}
