//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so a minimal (or absent) config file works.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the auction gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Ingress listener configuration (the three client-facing ports).
    pub listener: ListenerConfig,

    /// Worker pool settings.
    pub workers: WorkerPoolConfig,

    /// Heartbeat monitor settings.
    pub heartbeat: HeartbeatConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,
}

/// Client-facing listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Address the three listeners bind to.
    pub bind_address: String,

    /// HTTP ingress port.
    pub http_port: u16,

    /// TCP ingress port.
    pub tcp_port: u16,

    /// UDP ingress port.
    pub udp_port: u16,

    /// Maximum in-flight requests per protocol (handler pool size).
    pub max_inflight: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            http_port: 9000,
            tcp_port: 9001,
            udp_port: 9002,
            max_inflight: 10,
        }
    }
}

impl ListenerConfig {
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.http_port)
    }

    pub fn tcp_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.tcp_port)
    }

    pub fn udp_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.udp_port)
    }
}

/// Settings describing the registered worker fleet.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerPoolConfig {
    /// Host workers are reachable on. Workers announce only their port, so
    /// this is the host half of every registered endpoint.
    pub host: String,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
        }
    }
}

/// Heartbeat monitor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HeartbeatConfig {
    /// Enable the periodic heartbeat task.
    pub enabled: bool,

    /// Seconds between heartbeat sweeps.
    pub interval_secs: u64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 10,
        }
    }
}

impl HeartbeatConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Timeouts for probing and forwarding.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// HTTP and TCP liveness probe budget, in milliseconds.
    pub probe_ms: u64,

    /// UDP liveness probe budget, in milliseconds.
    pub probe_udp_ms: u64,

    /// Client-to-worker forwarding budget, in milliseconds.
    pub forward_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            probe_ms: 500,
            probe_udp_ms: 2_000,
            forward_ms: 5_000,
        }
    }
}

impl TimeoutConfig {
    pub fn probe(&self) -> Duration {
        Duration::from_millis(self.probe_ms)
    }

    pub fn probe_udp(&self) -> Duration {
        Duration::from_millis(self.probe_udp_ms)
    }

    pub fn forward(&self) -> Duration {
        Duration::from_millis(self.forward_ms)
    }
}
