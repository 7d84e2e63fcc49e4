//! Reward claim and price oracle client.

pub mod blockchain;
pub mod claim;
pub mod config;
pub mod lifecycle;
pub mod maintenance;
pub mod observability;
pub mod oracle;
pub mod units;

pub use blockchain::types::{ClaimError, ClaimResult};
pub use claim::{ClaimFlow, ClaimOutcome, ClaimState, WalletSession};
pub use config::schema::ClientConfig;
pub use lifecycle::Abandon;
pub use oracle::OracleReader;
