//! Dynamic service registry.
//!
//! # Data Flow
//! ```text
//! Worker startup → POST /registerServer → register()
//! Dispatcher probe failure ─┐
//! Heartbeat probe failure  ─┴→ remove()
//! Dispatcher / heartbeat / admin listar → snapshot()
//! ```
//!
//! # Design Decisions
//! - Endpoints live in an immutable `Arc<Vec<_>>` swapped atomically on every
//!   mutation (`arc-swap`), so readers never hold a lock and a removal cannot
//!   invalidate an index a concurrent `next()` is using
//! - The round-robin cursor is a monotonically increasing counter reduced
//!   modulo the snapshot length at selection time, which keeps it meaningful
//!   across mutations without reclamping
//! - Insertion order is preserved; removal is value-based

pub mod endpoint;

pub use endpoint::Endpoint;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::proto::Protocol;

#[derive(Debug, Default)]
struct Lane {
    endpoints: ArcSwap<Vec<Endpoint>>,
    cursor: AtomicUsize,
}

/// Per-protocol table of live worker endpoints.
#[derive(Debug, Default)]
pub struct ServiceRegistry {
    lanes: [Lane; 3],
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lane(&self, protocol: Protocol) -> &Lane {
        &self.lanes[protocol.index()]
    }

    /// Append an endpoint unless an identical one is already present.
    /// Returns `false` on the duplicate no-op.
    pub fn register(&self, endpoint: Endpoint) -> bool {
        let lane = self.lane(endpoint.protocol);
        let mut inserted = false;
        lane.endpoints.rcu(|current| {
            if current.iter().any(|e| *e == endpoint) {
                inserted = false;
                Vec::clone(current)
            } else {
                inserted = true;
                let mut next = Vec::clone(current);
                next.push(endpoint.clone());
                next
            }
        });
        if inserted {
            tracing::info!(endpoint = %endpoint, "Worker registered");
        } else {
            tracing::debug!(endpoint = %endpoint, "Duplicate registration ignored");
        }
        inserted
    }

    /// Remove every endpoint of `protocol` on `port`. Idempotent.
    pub fn remove(&self, protocol: Protocol, port: u16) {
        let lane = self.lane(protocol);
        let mut removed = false;
        lane.endpoints.rcu(|current| {
            let next: Vec<Endpoint> = current
                .iter()
                .filter(|e| e.port != port)
                .cloned()
                .collect();
            removed = next.len() != current.len();
            next
        });
        if removed {
            tracing::info!(%protocol, port, "Worker removed from registry");
        }
    }

    /// Read-only copy-on-write snapshot of a protocol's endpoints.
    pub fn snapshot(&self, protocol: Protocol) -> Arc<Vec<Endpoint>> {
        self.lane(protocol).endpoints.load_full()
    }

    pub fn len(&self, protocol: Protocol) -> usize {
        self.lane(protocol).endpoints.load().len()
    }

    pub fn is_empty(&self, protocol: Protocol) -> bool {
        self.len(protocol) == 0
    }

    /// Advance the protocol's round-robin cursor and return the index to use
    /// against a snapshot of length `len`.
    pub fn next_index(&self, protocol: Protocol, len: usize) -> usize {
        debug_assert!(len > 0);
        self.lane(protocol).cursor.fetch_add(1, Ordering::Relaxed) % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ep(protocol: Protocol, port: u16) -> Endpoint {
        Endpoint::new(protocol, "127.0.0.1", port)
    }

    #[test]
    fn registration_preserves_insertion_order() {
        let registry = ServiceRegistry::new();
        assert!(registry.register(ep(Protocol::Http, 8081)));
        assert!(registry.register(ep(Protocol::Http, 8082)));
        assert!(registry.register(ep(Protocol::Http, 8083)));

        let snapshot = registry.snapshot(Protocol::Http);
        let ports: Vec<u16> = snapshot.iter().map(|e| e.port).collect();
        assert_eq!(ports, vec![8081, 8082, 8083]);
    }

    #[test]
    fn duplicate_registration_is_a_silent_noop() {
        let registry = ServiceRegistry::new();
        assert!(registry.register(ep(Protocol::Tcp, 9100)));
        assert!(!registry.register(ep(Protocol::Tcp, 9100)));
        assert_eq!(registry.len(Protocol::Tcp), 1);
    }

    #[test]
    fn lanes_are_independent() {
        let registry = ServiceRegistry::new();
        registry.register(ep(Protocol::Http, 8081));
        registry.register(ep(Protocol::Udp, 8081));
        assert_eq!(registry.len(Protocol::Http), 1);
        assert_eq!(registry.len(Protocol::Udp), 1);
        assert_eq!(registry.len(Protocol::Tcp), 0);

        registry.remove(Protocol::Http, 8081);
        assert!(registry.is_empty(Protocol::Http));
        assert_eq!(registry.len(Protocol::Udp), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let registry = ServiceRegistry::new();
        registry.register(ep(Protocol::Udp, 8090));
        registry.remove(Protocol::Udp, 8090);
        registry.remove(Protocol::Udp, 8090);
        assert!(registry.is_empty(Protocol::Udp));
    }

    #[test]
    fn cursor_rotates_over_snapshot() {
        let registry = ServiceRegistry::new();
        registry.register(ep(Protocol::Http, 1));
        registry.register(ep(Protocol::Http, 2));

        let len = registry.len(Protocol::Http);
        let first = registry.next_index(Protocol::Http, len);
        let second = registry.next_index(Protocol::Http, len);
        let third = registry.next_index(Protocol::Http, len);
        assert_eq!(first, 0);
        assert_eq!(second, 1);
        assert_eq!(third, 0);
    }
}
