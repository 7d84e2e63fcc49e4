//! Gas estimation with a safety margin.

use serde::Serialize;

use crate::blockchain::contract::ContractAction;
use crate::blockchain::types::{CallError, ClaimError, ClaimResult};
use crate::claim::binding::ContractBinding;
use crate::claim::validator::ValidatedClaim;
use crate::observability::metrics;

/// Headroom applied to gas estimates (percent of the estimate).
pub const DEFAULT_GAS_MARGIN_PERCENT: u64 = 120;

/// Gas limit derived from a fresh estimate. Never reused across attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GasBudget {
    pub estimate: u64,
    pub applied_limit: u64,
}

impl GasBudget {
    /// `applied_limit = estimate * margin_percent / 100`, rounded down.
    pub fn with_margin(estimate: u64, margin_percent: u64) -> Self {
        let scaled = estimate as u128 * margin_percent as u128 / 100;
        Self {
            estimate,
            applied_limit: u64::try_from(scaled).unwrap_or(u64::MAX),
        }
    }
}

/// Simulate the claim and size its gas limit.
///
/// A simulated revert short-circuits with `SimulationReverted`.
pub async fn estimate_claim(
    binding: &ContractBinding,
    claim: &ValidatedClaim,
    margin_percent: u64,
) -> ClaimResult<GasBudget> {
    estimate(binding, ContractAction::Claim(claim.amount()), margin_percent).await
}

pub(crate) async fn estimate(
    binding: &ContractBinding,
    action: ContractAction,
    margin_percent: u64,
) -> ClaimResult<GasBudget> {
    let estimate = binding
        .contract()
        .estimate_gas(action)
        .await
        .map_err(|e| match e {
            CallError::Reverted(reason) => ClaimError::SimulationReverted { reason },
            CallError::Rejected(reason) => ClaimError::UserRejected(reason),
            CallError::Unavailable(reason) => ClaimError::OracleOrContractUnavailable(reason),
        })?;

    metrics::record_gas_estimate(estimate);
    let budget = GasBudget::with_margin(estimate, margin_percent);
    tracing::debug!(
        method = action.method(),
        estimate = budget.estimate,
        applied_limit = budget.applied_limit,
        "Gas estimated"
    );
    Ok(budget)
}
