//! Claim pipeline types.

use alloy::primitives::TxHash;
use serde::Serialize;
use std::fmt;

/// Where a claim attempt currently is.
///
/// `Confirmed`, `Reverted` and `TimedOut` are reported, then the flow
/// returns to `Idle`. No state survives into the next attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimState {
    Idle,
    Connecting,
    Bound,
    Validating,
    Estimating,
    Submitting,
    Confirmed,
    Reverted,
    TimedOut,
}

impl ClaimState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ClaimState::Confirmed | ClaimState::Reverted | ClaimState::TimedOut
        )
    }
}

impl fmt::Display for ClaimState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClaimState::Idle => "idle",
            ClaimState::Connecting => "connecting",
            ClaimState::Bound => "bound",
            ClaimState::Validating => "validating",
            ClaimState::Estimating => "estimating",
            ClaimState::Submitting => "submitting",
            ClaimState::Confirmed => "confirmed",
            ClaimState::Reverted => "reverted",
            ClaimState::TimedOut => "timed_out",
        };
        f.write_str(name)
    }
}

/// Successful end of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClaimOutcome {
    /// Mined with the required number of confirmations.
    Confirmed { tx_hash: TxHash, block_number: u64 },
    /// The caller stopped waiting. The transaction was broadcast and may
    /// still succeed or fail on-chain; this is not a failure.
    Abandoned { tx_hash: TxHash },
}

impl ClaimOutcome {
    pub fn tx_hash(&self) -> TxHash {
        match self {
            ClaimOutcome::Confirmed { tx_hash, .. } | ClaimOutcome::Abandoned { tx_hash } => *tx_hash,
        }
    }
}
