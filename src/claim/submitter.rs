//! Transaction submission and confirmation monitoring.
//!
//! # Responsibilities
//! - Broadcast a state-changing call with an explicit gas limit, unless
//!   the caller abandoned before broadcast
//! - Poll for the receipt until it has enough confirmations
//! - Bound the wait, and let the caller abandon it
//!
//! Nothing here retries. A reverted or timed-out transaction is reported
//! and the caller decides whether to start a fresh, fully re-validated
//! attempt.

use alloy::primitives::TxHash;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::blockchain::contract::{ContractAction, RewardContract};
use crate::blockchain::types::{
    BlockchainConfig, CallError, ClaimError, ClaimResult, ConfirmationStatus,
};
use crate::claim::binding::ContractBinding;
use crate::claim::gas::GasBudget;
use crate::claim::types::ClaimOutcome;
use crate::claim::validator::ValidatedClaim;
use crate::lifecycle::abandon::{abandoned, fired};

/// How long and how deep to wait for a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    /// Blocks, including the inclusion block, before a receipt counts.
    pub required_confirmations: u32,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl ConfirmationPolicy {
    pub fn from_config(config: &BlockchainConfig) -> Self {
        Self {
            required_confirmations: config.confirmation_blocks.max(1),
            timeout: Duration::from_secs(config.confirmation_timeout_secs),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }
}

/// Submit a validated claim and wait for it.
///
/// Consumes the [`ValidatedClaim`]: a retry has to validate again.
pub async fn submit_claim(
    binding: &ContractBinding,
    claim: ValidatedClaim,
    budget: GasBudget,
    policy: ConfirmationPolicy,
    abandon: &mut broadcast::Receiver<()>,
) -> ClaimResult<ClaimOutcome> {
    submit(binding, ContractAction::Claim(claim.amount()), budget, policy, abandon).await
}

pub(crate) async fn submit(
    binding: &ContractBinding,
    action: ContractAction,
    budget: GasBudget,
    policy: ConfirmationPolicy,
    abandon: &mut broadcast::Receiver<()>,
) -> ClaimResult<ClaimOutcome> {
    let contract = binding.contract();
    if fired(abandon) {
        tracing::info!(method = action.method(), "Abandoned before broadcast; nothing sent");
        return Err(ClaimError::Cancelled);
    }

    let tx_hash = contract
        .send(action, budget.applied_limit)
        .await
        .map_err(|e| match e {
            CallError::Reverted(reason) => ClaimError::TransactionReverted { reason },
            CallError::Rejected(reason) => ClaimError::UserRejected(reason),
            CallError::Unavailable(reason) => ClaimError::OracleOrContractUnavailable(reason),
        })?;

    tracing::info!(
        tx_hash = %tx_hash,
        method = action.method(),
        gas_limit = budget.applied_limit,
        "Transaction broadcast, waiting for confirmation"
    );

    tokio::select! {
        status = wait_for_confirmation(contract, tx_hash, policy) => match status? {
            ConfirmationStatus::Confirmed { block_number } => {
                tracing::info!(tx_hash = %tx_hash, block_number, "Transaction confirmed");
                Ok(ClaimOutcome::Confirmed { tx_hash, block_number })
            }
            ConfirmationStatus::Failed(reason) => Err(ClaimError::TransactionReverted { reason }),
        },
        _ = abandoned(abandon) => {
            tracing::warn!(
                tx_hash = %tx_hash,
                "Confirmation wait abandoned; the transaction may still be mined"
            );
            Ok(ClaimOutcome::Abandoned { tx_hash })
        }
    }
}

/// Wait for a transaction to be confirmed.
///
/// Returns `Confirmed` or `Failed`; a wait longer than `policy.timeout`
/// yields `TransactionTimeout`. Poll errors are logged and polling goes on,
/// since the transaction is already in flight.
pub async fn wait_for_confirmation(
    contract: &dyn RewardContract,
    tx_hash: TxHash,
    policy: ConfirmationPolicy,
) -> ClaimResult<ConfirmationStatus> {
    let required = policy.required_confirmations.max(1);

    let result = timeout(policy.timeout, async {
        let mut ticker = interval(policy.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let receipt = match contract.receipt(tx_hash).await {
                Ok(Some(r)) => r,
                Ok(None) => {
                    tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt poll failed");
                    continue;
                }
            };

            if !receipt.success {
                return ConfirmationStatus::Failed(format!(
                    "transaction {} reverted in block {}",
                    tx_hash,
                    receipt
                        .block_number
                        .map(|b| b.to_string())
                        .unwrap_or_else(|| "unknown".to_string())
                ));
            }

            let Some(tx_block) = receipt.block_number else {
                continue;
            };
            tracing::debug!(
                tx_hash = %tx_hash,
                block_number = tx_block,
                gas_used = receipt.gas_used,
                "Transaction mined"
            );
            if required == 1 {
                return ConfirmationStatus::Confirmed { block_number: tx_block };
            }

            let current_block = match contract.block_number().await {
                Ok(block) => block,
                Err(e) => {
                    tracing::warn!(error = %e, "Block number poll failed");
                    continue;
                }
            };
            let depth = confirmations(current_block, tx_block);

            if depth >= required {
                return ConfirmationStatus::Confirmed { block_number: tx_block };
            }

            tracing::debug!(
                tx_hash = %tx_hash,
                confirmations = depth,
                required = required,
                "Waiting for confirmations"
            );
        }
    })
    .await;

    match result {
        Ok(status) => Ok(status),
        Err(_) => Err(ClaimError::TransactionTimeout { tx_hash }),
    }
}

/// Blocks on top of `tx_block`, counting it. Saturates instead of wrapping.
fn confirmations(current_block: u64, tx_block: u64) -> u32 {
    let depth = current_block.saturating_sub(tx_block).saturating_add(1);
    u32::try_from(depth).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_config() {
        let config = BlockchainConfig {
            confirmation_blocks: 0,
            confirmation_timeout_secs: 30,
            poll_interval_ms: 500,
            ..BlockchainConfig::default()
        };
        let policy = ConfirmationPolicy::from_config(&config);
        assert_eq!(policy.required_confirmations, 1);
        assert_eq!(policy.timeout, Duration::from_secs(30));
        assert_eq!(policy.poll_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_confirmations_count_inclusion_block() {
        assert_eq!(confirmations(42, 42), 1);
        assert_eq!(confirmations(44, 42), 3);
    }

    #[test]
    fn test_confirmations_saturate() {
        // Stale node behind the receipt's block.
        assert_eq!(confirmations(40, 42), 1);
        // A gap wider than u32 must not wrap to a small count.
        assert_eq!(confirmations(u64::from(u32::MAX) + 10, 0), u32::MAX);
        assert_eq!(confirmations(u64::MAX, 0), u32::MAX);
    }
}
