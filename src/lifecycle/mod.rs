//! Process lifecycle: `Starting → Running → Stopping`.
//!
//! Shutdown is a broadcast channel every long-running task subscribes to.
//! It is triggered by the admin `sair` command or by Ctrl-C; both funnel
//! through the same path so listeners, the heartbeat scheduler, and the
//! admin loop stop together.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Trigger shutdown when the process receives Ctrl-C.
    pub fn trigger_on_ctrl_c(&self) {
        let shutdown = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl-C received, shutting down");
                shutdown.trigger();
            }
        });
    }

}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
