//! Reward claim pipeline.
//!
//! # Data Flow
//! ```text
//! session.rs   (WalletSession: connect / disconnect)
//!     → binding.rs   (ContractBinding: signer + contract, no network)
//!     → validator.rs (eligibility ∥ balance → ValidatedClaim)
//!     → gas.rs       (simulate → GasBudget, 20% headroom)
//!     → submitter.rs (send → poll receipt → ClaimOutcome)
//! flow.rs drives the stages and publishes ClaimState.
//! ```
//!
//! # Invariants
//! - Nothing is submitted without a `ValidatedClaim` from the same attempt
//! - No stage retries; every retry starts a new attempt

pub mod binding;
pub mod flow;
pub mod gas;
pub mod session;
pub mod submitter;
pub mod types;
pub mod validator;

pub use binding::{AlloyBinder, ContractBinder, ContractBinding};
pub use flow::{ClaimFlow, ClaimSettings};
pub use gas::GasBudget;
pub use session::WalletSession;
pub use submitter::ConfirmationPolicy;
pub use types::{ClaimOutcome, ClaimState};
pub use validator::{ClaimRequest, ValidatedClaim};
