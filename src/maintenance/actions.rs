//! Keeper transactions: lottery draw and price refresh.
//!
//! Same estimate → send → confirm path as a claim, without the pre-flight
//! eligibility checks. Access control is left to the contract; a caller
//! without rights sees `SimulationReverted` and nothing is sent.

use tokio::sync::broadcast;
use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::contract::ContractAction;
use crate::blockchain::types::ClaimResult;
use crate::claim::binding::ContractBinding;
use crate::claim::gas;
use crate::claim::submitter::{self, ConfirmationPolicy};
use crate::claim::types::ClaimOutcome;
use crate::lifecycle::abandon::drain;

/// State-changing maintenance calls for a bound signer.
pub struct ContractActions<'a> {
    binding: &'a ContractBinding,
    gas_margin_percent: u64,
    policy: ConfirmationPolicy,
}

impl<'a> ContractActions<'a> {
    pub fn new(
        binding: &'a ContractBinding,
        gas_margin_percent: u64,
        policy: ConfirmationPolicy,
    ) -> Self {
        Self {
            binding,
            gas_margin_percent,
            policy,
        }
    }

    /// `runLottery()`.
    pub async fn run_lottery(
        &self,
        abandon: &mut broadcast::Receiver<()>,
    ) -> ClaimResult<ClaimOutcome> {
        self.execute(ContractAction::RunLottery, abandon).await
    }

    /// `updatePrices()`; refreshes the stored USD value from the feed.
    pub async fn update_prices(
        &self,
        abandon: &mut broadcast::Receiver<()>,
    ) -> ClaimResult<ClaimOutcome> {
        self.execute(ContractAction::UpdatePrices, abandon).await
    }

    async fn execute(
        &self,
        action: ContractAction,
        abandon: &mut broadcast::Receiver<()>,
    ) -> ClaimResult<ClaimOutcome> {
        let span = tracing::info_span!(
            "maintenance",
            attempt_id = %Uuid::new_v4(),
            method = action.method(),
            signer = %self.binding.signer_address()
        );

        drain(abandon);
        async {
            let budget = gas::estimate(self.binding, action, self.gas_margin_percent).await?;
            submitter::submit(self.binding, action, budget, self.policy, abandon).await
        }
        .instrument(span)
        .await
    }
}
