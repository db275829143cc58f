//! Shutdown coordination for the gateway.

use tokio::sync::broadcast;

/// Hands out listeners that resolve once shutdown is triggered.
///
/// The serve loop holds one listener; integration tests and embedders
/// hold the coordinator to stop the gateway programmatically.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Obtain a listener for the shutdown signal.
    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Trigger the shutdown signal; every listener resolves.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// One task's view of the shutdown signal.
pub struct ShutdownListener {
    rx: broadcast::Receiver<()>,
}

impl ShutdownListener {
    /// Wait until shutdown is triggered.
    ///
    /// A dropped coordinator counts as shutdown; a listener must never
    /// keep its task serving forever.
    pub async fn recv(&mut self) {
        let _ = self.rx.recv().await;
    }
}
