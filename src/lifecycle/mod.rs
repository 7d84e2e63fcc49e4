//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Abandon (abandon.rs):
//!     Caller gives up before broadcast → nothing sent → Cancelled
//!     Caller gives up after broadcast  → confirmation wait stops → Abandoned
//!
//! Signals (signals.rs):
//!     SIGINT (Ctrl-C) → Trigger abandon
//! ```
//!
//! # Design Decisions
//! - Abandoning only stops local waiting; a broadcast transaction still executes
//! - Signals are translated into the same abandon channel callers use

pub mod abandon;
pub mod signals;

pub use abandon::Abandon;
