//! Round-robin dispatch with inline liveness probing.
//!
//! # Data Flow
//! ```text
//! Ingress request → next(protocol)
//!     → registry snapshot (empty → NoBackend)
//!     → advance cursor, pick endpoint
//!     → probe it (probe.rs)
//!     → alive: return endpoint
//!     → dead: eject from registry, start over
//! ```
//!
//! # Design Decisions
//! - The cursor is advanced before probing, so a failing endpoint is ejected
//!   exactly once per traversal instead of being re-picked
//! - Every failed probe removes its endpoint, so each retry runs against a
//!   strictly smaller registry and the loop always terminates
//! - Forwarding failures never reach this module; only probe failures eject

pub mod probe;

use std::sync::Arc;

use axum::body::Body;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::config::TimeoutConfig;
use crate::error::GatewayError;
use crate::proto::Protocol;
use crate::registry::{Endpoint, ServiceRegistry};

/// Shared plaintext HTTP client used for probes and forwarding.
pub type HttpClient = Client<HttpConnector, Body>;

/// Build the gateway's shared HTTP client.
pub fn http_client() -> HttpClient {
    Client::builder(TokioExecutor::new()).build(HttpConnector::new())
}

/// Selects a live worker endpoint per protocol, ejecting dead ones.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ServiceRegistry>,
    client: HttpClient,
    timeouts: TimeoutConfig,
}

impl Dispatcher {
    pub fn new(registry: Arc<ServiceRegistry>, client: HttpClient, timeouts: TimeoutConfig) -> Self {
        Self {
            registry,
            client,
            timeouts,
        }
    }

    /// Pick the next live endpoint for `protocol`.
    ///
    /// Probes the round-robin candidate before returning it; an unresponsive
    /// candidate is ejected from the registry and the next one is tried until
    /// a live endpoint is found or the registry lane empties.
    pub async fn next(&self, protocol: Protocol) -> Result<Endpoint, GatewayError> {
        loop {
            let snapshot = self.registry.snapshot(protocol);
            if snapshot.is_empty() {
                return Err(GatewayError::NoBackend(protocol));
            }
            let index = self.registry.next_index(protocol, snapshot.len());
            let endpoint = snapshot[index].clone();

            match probe::probe(
                &endpoint,
                &self.client,
                self.timeouts.probe(),
                self.timeouts.probe_udp(),
            )
            .await
            {
                Ok(()) => return Ok(endpoint),
                Err(err) => {
                    tracing::warn!(
                        endpoint = %endpoint,
                        error = %err,
                        "Probe failed on dispatch path, ejecting worker"
                    );
                    self.registry.remove(protocol, endpoint.port);
                }
            }
        }
    }
}
