//! Heartbeat subsystem.
//!
//! # Data Flow
//! ```text
//! Periodic timer (10 s)
//!     → registry snapshot per protocol
//!     → probe every endpoint (dispatch::probe), in parallel
//!     → failures → targeted registry.remove()
//! ```
//!
//! # Design Decisions
//! - The monitor never touches registry internals while probing; it works on
//!   immutable snapshots and issues value-based removals afterwards
//! - Probe timeouts count as failures
//! - Complements the dispatch-path probe: the monitor garbage-collects idle
//!   lanes, the dispatcher prunes eagerly on the request path

pub mod monitor;

pub use monitor::HeartbeatMonitor;
