//! Caller-initiated abandonment of a pending confirmation wait.

use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};

/// Coordinator for abandoning in-flight waits.
///
/// Provides a broadcast channel that every waiting claim can subscribe to.
/// Abandoning never retracts a transaction that was already broadcast.
pub struct Abandon {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Abandon {
    /// Create a new abandon coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the abandon signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the abandon signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of waits currently listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Abandon {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once the signal fires. Never resolves if every sender is gone.
pub async fn abandoned(rx: &mut broadcast::Receiver<()>) {
    loop {
        match rx.recv().await {
            Ok(()) | Err(RecvError::Lagged(_)) => return,
            Err(RecvError::Closed) => std::future::pending::<()>().await,
        }
    }
}

/// Discard signals sent before the current attempt started.
pub fn drain(rx: &mut broadcast::Receiver<()>) {
    loop {
        match rx.try_recv() {
            Ok(()) | Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return,
        }
    }
}

/// Whether a signal is waiting, without blocking. Consumes it if so.
pub fn fired(rx: &mut broadcast::Receiver<()>) -> bool {
    matches!(rx.try_recv(), Ok(()) | Err(TryRecvError::Lagged(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_reaches_subscriber() {
        let abandon = Abandon::new();
        let mut rx = abandon.subscribe();
        assert_eq!(abandon.receiver_count(), 1);

        abandon.trigger();
        tokio::time::timeout(Duration::from_secs(1), abandoned(&mut rx))
            .await
            .expect("abandon signal not delivered");
    }

    #[tokio::test]
    async fn test_dropped_sender_does_not_abandon() {
        let abandon = Abandon::new();
        let mut rx = abandon.subscribe();
        drop(abandon);

        let result = tokio::time::timeout(Duration::from_millis(50), abandoned(&mut rx)).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_drain_discards_earlier_signals() {
        let abandon = Abandon::new();
        let mut rx = abandon.subscribe();
        abandon.trigger();
        abandon.trigger();

        drain(&mut rx);
        assert!(!fired(&mut rx));

        abandon.trigger();
        assert!(fired(&mut rx));
        assert!(!fired(&mut rx));
    }

    #[test]
    fn test_closed_channel_has_not_fired() {
        let abandon = Abandon::new();
        let mut rx = abandon.subscribe();
        drop(abandon);

        drain(&mut rx);
        assert!(!fired(&mut rx));
    }
}
