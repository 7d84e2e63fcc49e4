//! Pre-flight checks: eligibility and balance.
//!
//! These are advisory. State can change between the check and the
//! submission, so the chain may still reject a claim that passed here.

use alloy::primitives::{Address, U256};

use crate::blockchain::types::{ClaimError, ClaimResult};
use crate::claim::binding::ContractBinding;
use crate::units;

/// A requested claim for the bound signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimRequest {
    /// Scaled token units, always > 0.
    amount: U256,
    requester: Address,
}

impl ClaimRequest {
    /// Request `amount` scaled units for the binding's signer.
    pub fn new(binding: &ContractBinding, amount: U256) -> ClaimResult<Self> {
        if amount.is_zero() {
            return Err(ClaimError::InvalidAmount(
                "amount must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            amount,
            requester: binding.signer_address(),
        })
    }

    /// Parse a decimal amount such as `"12.5"` at `decimals` precision.
    pub fn parse(binding: &ContractBinding, amount: &str, decimals: u8) -> ClaimResult<Self> {
        Self::new(binding, units::parse_amount(amount, decimals)?)
    }

    pub fn amount(&self) -> U256 {
        self.amount
    }

    pub fn requester(&self) -> Address {
        self.requester
    }
}

/// A claim that passed both eligibility and balance checks in this attempt.
///
/// Only [`validate`] produces one; estimation and submission require one.
#[derive(Debug, PartialEq, Eq)]
pub struct ValidatedClaim {
    request: ClaimRequest,
    balance: U256,
}

impl ValidatedClaim {
    pub fn request(&self) -> &ClaimRequest {
        &self.request
    }

    pub fn amount(&self) -> U256 {
        self.request.amount
    }

    /// Balance observed during validation.
    pub fn balance(&self) -> U256 {
        self.balance
    }
}

/// Ask the contract whether the bound signer may claim right now.
pub async fn check_eligibility(binding: &ContractBinding) -> ClaimResult<bool> {
    let address = binding.signer_address();
    let eligible = binding
        .contract()
        .is_eligible_for_reward(address)
        .await
        .map_err(|e| e.into_contract_error())?;
    tracing::debug!(address = %address, eligible, "Eligibility checked");
    Ok(eligible)
}

/// Read the bound signer's token balance in scaled units.
pub async fn fetch_balance(binding: &ContractBinding) -> ClaimResult<U256> {
    binding
        .contract()
        .balance_of(binding.signer_address())
        .await
        .map_err(|e| e.into_contract_error())
}

/// Reject a request that exceeds `available`.
pub fn check_balance(request: &ClaimRequest, available: U256) -> ClaimResult<()> {
    if request.amount > available {
        return Err(ClaimError::InsufficientBalance {
            required: request.amount,
            available,
        });
    }
    Ok(())
}

/// Run the eligibility and balance reads concurrently; both must pass.
pub async fn validate(binding: &ContractBinding, request: ClaimRequest) -> ClaimResult<ValidatedClaim> {
    if request.requester != binding.signer_address() {
        return Err(ClaimError::SignerMismatch {
            requester: request.requester,
            signer: binding.signer_address(),
        });
    }

    let (eligible, balance) = tokio::try_join!(check_eligibility(binding), fetch_balance(binding))?;

    if !eligible {
        return Err(ClaimError::NotEligible {
            address: request.requester,
        });
    }
    check_balance(&request, balance)?;

    tracing::info!(
        address = %request.requester,
        amount = %request.amount,
        balance = %balance,
        "Claim validated"
    );
    Ok(ValidatedClaim { request, balance })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: u64) -> ClaimRequest {
        ClaimRequest {
            amount: U256::from(amount),
            requester: Address::ZERO,
        }
    }

    #[test]
    fn test_balance_exactly_enough() {
        assert!(check_balance(&request(50), U256::from(50)).is_ok());
    }

    #[test]
    fn test_balance_insufficient() {
        let err = check_balance(&request(100), U256::from(50)).unwrap_err();
        match err {
            ClaimError::InsufficientBalance { required, available } => {
                assert_eq!(required, U256::from(100));
                assert_eq!(available, U256::from(50));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
