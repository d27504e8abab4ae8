//! Client-facing ingress.
//!
//! # Data Flow
//! ```text
//! HTTP body / TCP line / UDP datagram
//!     → parse command (proto)
//!     → dispatcher.next(protocol)   (probe + eject inside)
//!     → forward on the worker's transport, await reply (5 s budget)
//!     → relay reply to the originating client
//! ```
//!
//! # Design Decisions
//! - The three listeners share one `GatewayContext` (config, registry,
//!   dispatcher, HTTP client); each runs as an independent task
//! - Per-protocol handler pools are bounded by a semaphore, acquired before
//!   accepting, so the listener itself applies backpressure
//! - Forwarding failures surface as error responses but never eject the
//!   worker; ejection belongs to the probe paths only

pub mod http;
pub mod tcp;
pub mod udp;

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::dispatch::{self, Dispatcher, HttpClient};
use crate::registry::ServiceRegistry;

/// State shared by the three ingress listeners.
pub struct GatewayContext {
    pub config: GatewayConfig,
    pub registry: Arc<ServiceRegistry>,
    pub dispatcher: Dispatcher,
    pub client: HttpClient,
}

impl GatewayContext {
    pub fn new(config: GatewayConfig) -> Arc<Self> {
        let registry = Arc::new(ServiceRegistry::new());
        let client = dispatch::http_client();
        let dispatcher = Dispatcher::new(
            Arc::clone(&registry),
            client.clone(),
            config.timeouts.clone(),
        );
        Arc::new(Self {
            config,
            registry,
            dispatcher,
            client,
        })
    }
}
