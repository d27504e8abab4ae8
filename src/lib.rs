//! Distributed auction gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────┐
//!                 │                    GATEWAY                        │
//!   HTTP :9000 ───┼─▶ ingress::http ─┐                                │
//!   TCP  :9001 ───┼─▶ ingress::tcp ──┼─▶ dispatch (round-robin +      │
//!   UDP  :9002 ───┼─▶ ingress::udp ──┘      inline probe, eject)      │
//!                 │        ▲                     │                    │
//!                 │        │                     ▼                    │
//!                 │   registry (arc-swap   forward on the worker's    │
//!                 │   snapshots + cursor)  own transport, 5 s budget  │
//!                 │        ▲                                          │
//!                 │        │ eject                                    │
//!                 │   health (10 s heartbeat sweep)                   │
//!                 └──────────────────────────────────────────────────┘
//!                          ▲ POST /registerServer ("proto;port")
//!                 ┌────────┴───────┐
//!                 │ WORKER (1..n)  │  one transport each, stateless,
//!                 │ worker::*      │  answers probes, talks to store
//!                 └────────┬───────┘
//!                          ▼
//!                 store (Postgres row-locked bids)
//! ```

// Core subsystems
pub mod config;
pub mod dispatch;
pub mod ingress;
pub mod proto;
pub mod registry;

// Backend side
pub mod store;
pub mod worker;

// Cross-cutting concerns
pub mod admin;
pub mod error;
pub mod health;
pub mod lifecycle;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use ingress::GatewayContext;
pub use lifecycle::Shutdown;
