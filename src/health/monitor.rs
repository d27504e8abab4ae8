//! Periodic heartbeat checking.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tokio::time;

use crate::config::{HeartbeatConfig, TimeoutConfig};
use crate::dispatch::probe;
use crate::dispatch::HttpClient;
use crate::proto::Protocol;
use crate::registry::ServiceRegistry;

/// Periodically sweeps the registry and ejects unresponsive workers.
pub struct HeartbeatMonitor {
    registry: Arc<ServiceRegistry>,
    client: HttpClient,
    config: HeartbeatConfig,
    timeouts: TimeoutConfig,
}

impl HeartbeatMonitor {
    pub fn new(
        registry: Arc<ServiceRegistry>,
        client: HttpClient,
        config: HeartbeatConfig,
        timeouts: TimeoutConfig,
    ) -> Self {
        Self {
            registry,
            client,
            config,
            timeouts,
        }
    }

    /// Run until the shutdown signal fires.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.config.enabled {
            tracing::info!("Heartbeat monitor disabled");
            return;
        }

        tracing::info!(
            interval_secs = self.config.interval_secs,
            "Heartbeat monitor starting"
        );

        let mut ticker = time::interval(self.config.interval());
        // The first tick fires immediately; skip it so freshly registered
        // workers get a full interval before their first sweep.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Heartbeat monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Probe every registered endpoint once, ejecting the dead.
    pub async fn sweep(&self) {
        let mut probes = JoinSet::new();

        for protocol in Protocol::ALL {
            for endpoint in self.registry.snapshot(protocol).iter().cloned() {
                let client = self.client.clone();
                let probe_budget = self.timeouts.probe();
                let udp_budget = self.timeouts.probe_udp();
                probes.spawn(async move {
                    let result =
                        probe::probe(&endpoint, &client, probe_budget, udp_budget).await;
                    (endpoint, result)
                });
            }
        }

        while let Some(joined) = probes.join_next().await {
            let Ok((endpoint, result)) = joined else {
                continue;
            };
            match result {
                Ok(()) => {
                    tracing::debug!(endpoint = %endpoint, "Heartbeat ok");
                }
                Err(err) => {
                    tracing::warn!(
                        endpoint = %endpoint,
                        error = %err,
                        "Heartbeat failed, ejecting worker"
                    );
                    self.registry.remove(endpoint.protocol, endpoint.port);
                }
            }
        }
    }
}
