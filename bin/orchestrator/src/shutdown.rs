//! Cooperative shutdown signal shared by all monitoring tasks.

use tokio::sync::watch;

/// Create a connected trigger/listener pair.
pub fn channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, Shutdown { rx })
}

/// Fires the shutdown signal. Dropping the trigger also fires it.
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Listener side of the shutdown signal, cloned into every task.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// Resolves once shutdown has been requested, immediately if it already was.
    pub async fn cancelled(&mut self) {
        // An error means the trigger is gone, which counts as shutdown.
        let _ = self.rx.wait_for(|cancelled| *cancelled).await;
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }
}
