//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash, U256};
use alloy::transports::{RpcError, TransportError};
use thiserror::Error;

pub use crate::config::schema::BlockchainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Every way a wallet, contract or oracle interaction can fail.
///
/// Each variant maps to a distinct message the user can act on.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// No compatible wallet could be reached.
    #[error("No wallet available: {0}")]
    WalletUnavailable(String),

    /// The user declined the wallet prompt.
    #[error("Request rejected in wallet: {0}")]
    UserRejected(String),

    /// A contract binding was requested before a wallet was connected.
    #[error("No signer available: connect a wallet first")]
    NoSignerAvailable,

    /// A read against the contract failed.
    #[error("Contract unavailable: {0}")]
    OracleOrContractUnavailable(String),

    /// The signer is not currently eligible to claim.
    #[error("Address {address} is not eligible for a reward")]
    NotEligible { address: Address },

    /// Claims can only be made for the connected signer's own address.
    #[error("Cannot claim for {requester} while connected as {signer}")]
    SignerMismatch { requester: Address, signer: Address },

    /// The requested amount could not be used.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Requested amount exceeds the on-chain balance (scaled units).
    #[error("Insufficient balance: need {required}, have {available}")]
    InsufficientBalance { required: U256, available: U256 },

    /// The dry-run of the call reverted.
    #[error("Claim would revert: {reason}")]
    SimulationReverted { reason: String },

    /// The chain rejected the submitted transaction.
    #[error("Transaction reverted: {reason}")]
    TransactionReverted { reason: String },

    /// The caller gave up before anything was broadcast.
    #[error("Cancelled before broadcast; no transaction was sent")]
    Cancelled,

    /// Confirmation was not observed in time. The outcome is unknown.
    #[error("Transaction {tx_hash} not confirmed in time; check it on a block explorer before retrying")]
    TransactionTimeout { tx_hash: TxHash },

    /// A price feed read failed. The value is unknown, not zero.
    #[error("Price oracle unavailable: {0}")]
    OracleUnavailable(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Configuration could not be turned into a client.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClaimError {
    /// Short stable label used in metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ClaimError::WalletUnavailable(_) => "wallet_unavailable",
            ClaimError::UserRejected(_) => "user_rejected",
            ClaimError::NoSignerAvailable => "no_signer",
            ClaimError::OracleOrContractUnavailable(_) => "contract_unavailable",
            ClaimError::NotEligible { .. } => "not_eligible",
            ClaimError::SignerMismatch { .. } => "signer_mismatch",
            ClaimError::InvalidAmount(_) => "invalid_amount",
            ClaimError::InsufficientBalance { .. } => "insufficient_balance",
            ClaimError::SimulationReverted { .. } => "simulation_reverted",
            ClaimError::TransactionReverted { .. } => "reverted",
            ClaimError::Cancelled => "cancelled",
            ClaimError::TransactionTimeout { .. } => "timed_out",
            ClaimError::OracleUnavailable(_) => "oracle_unavailable",
            ClaimError::ChainMismatch { .. } => "chain_mismatch",
            ClaimError::Config(_) => "config",
        }
    }
}

/// Result type for claim and oracle operations.
pub type ClaimResult<T> = Result<T, ClaimError>;

/// Classification of a failed contract call, before it is mapped to a
/// [`ClaimError`] by the stage that made the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// The node executed the call and it reverted.
    #[error("reverted: {0}")]
    Reverted(String),

    /// The wallet refused to sign.
    #[error("rejected: {0}")]
    Rejected(String),

    /// Transport failure or timeout; nothing is known about execution.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

/// EIP-1193 "user rejected request".
pub const USER_REJECTED_CODE: i64 = 4001;

/// JSON-RPC code nodes use for `execution reverted`.
pub const EXECUTION_REVERTED_CODE: i64 = 3;

impl CallError {
    /// Classify a JSON-RPC failure.
    pub fn from_transport(err: &TransportError) -> Self {
        match err {
            RpcError::ErrorResp(payload) if payload.code == USER_REJECTED_CODE => {
                CallError::Rejected(payload.message.to_string())
            }
            RpcError::ErrorResp(payload)
                if payload.code == EXECUTION_REVERTED_CODE
                    || payload.message.to_lowercase().contains("revert") =>
            {
                CallError::Reverted(payload.message.to_string())
            }
            other => CallError::Unavailable(other.to_string()),
        }
    }

    /// Map a failed read to the contract-read taxonomy.
    pub fn into_contract_error(self) -> ClaimError {
        match self {
            CallError::Rejected(reason) => ClaimError::UserRejected(reason),
            other => ClaimError::OracleOrContractUnavailable(other.to_string()),
        }
    }

    /// Map a failed price feed read.
    pub fn into_oracle_error(self) -> ClaimError {
        ClaimError::OracleUnavailable(self.to_string())
    }
}

/// Result type for raw contract calls.
pub type CallResult<T> = Result<T, CallError>;

/// The parts of a receipt the client acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptSummary {
    /// Whether execution succeeded.
    pub success: bool,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// A token quantity in raw units and human form.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TokenAmount {
    pub raw: U256,
    pub formatted: String,
    pub symbol: String,
}

impl std::fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.formatted, self.symbol)
    }
}

/// Transaction confirmation status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Transaction is confirmed with required block depth.
    Confirmed { block_number: u64 },
    /// Transaction was mined and reverted.
    Failed(String),
}
