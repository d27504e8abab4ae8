//! Error taxonomy for the gateway request path.
//!
//! Business outcomes (a losing bid, an unknown item) are NOT errors; they are
//! encoded in [`crate::store::BidOutcome`] and travel back as plaintext
//! success responses. This type covers the transport-level failures only.

use std::time::Duration;

use crate::proto::{ParseError, Protocol};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Malformed body or command line.
    #[error("malformed request: {0}")]
    Parse(#[from] ParseError),

    /// No live worker of the requested protocol is registered.
    #[error("no live {0} worker registered")]
    NoBackend(Protocol),

    /// The selected worker did not answer within the forwarding budget.
    #[error("worker did not respond within {0:?}")]
    BackendTimeout(Duration),

    /// The selected worker answered with a failure.
    #[error("worker failure: {0}")]
    BackendFailure(String),

    /// Socket-level failure while talking to a worker.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}
