//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Wallet endpoint / environment key
//!     → wallet.rs (account request, signing identity)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → contract.rs (typed Zero2Hero calls, error classification)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC reads have configurable timeouts

pub mod client;
pub mod contract;
pub mod types;
pub mod wallet;

pub use client::ChainClient;
pub use contract::{AlloyRewardContract, ContractAction, RewardContract, UpkeepCheck};
pub use types::{
    CallError, ChainId, ClaimError, ClaimResult, ConfirmationStatus, ReceiptSummary,
    TokenAmount,
};
pub use wallet::{SignerIdentity, WalletConnector};
