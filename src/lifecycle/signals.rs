//! OS signal handling.
//!
//! Ctrl-C while a claim is waiting for confirmation abandons the wait
//! instead of killing the process, so the transaction hash still gets
//! reported.

use std::sync::Arc;

use crate::lifecycle::abandon::Abandon;

/// Spawn a task that triggers `abandon` on the first Ctrl-C.
pub fn abandon_on_ctrl_c(abandon: Arc<Abandon>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("Interrupt received, abandoning confirmation wait");
                abandon.trigger();
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
        }
    })
}
