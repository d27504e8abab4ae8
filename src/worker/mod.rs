//! Backend worker: one transport listener in front of the item store.
//!
//! # Data Flow
//! ```text
//! startup → bind listener → announce "<protocol>;<port>" to the gateway
//! request → transport framing (http.rs / tcp.rs / udp.rs)
//!     → handler.rs (parse outcome → store call → response string)
//!     → reply on the same transport
//! probe (`/heartbeat`, `ping`) → answered locally, store untouched
//! ```
//!
//! # Design Decisions
//! - Workers are stateless and interchangeable; all auction state lives in
//!   the store, so any number of workers per protocol can run
//! - Registration failure is logged but does not kill the worker: the
//!   gateway simply never routes to it until a later registration succeeds

pub mod handler;
pub mod http;
pub mod registration;
pub mod tcp;
pub mod udp;

use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::broadcast;

use crate::proto::Protocol;
use crate::store::SharedStore;

/// Startup parameters for one worker process.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub protocol: Protocol,
    pub bind_address: String,
    pub port: u16,
    pub gateway_url: String,
}

/// Bind the worker's listener, announce it to the gateway, and serve until
/// shutdown. Returns the port actually bound (relevant when `port` is 0).
pub async fn run(
    settings: WorkerSettings,
    store: SharedStore,
    shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    let addr = format!("{}:{}", settings.bind_address, settings.port);
    match settings.protocol {
        Protocol::Http => {
            let listener = TcpListener::bind(&addr).await?;
            let port = listener.local_addr()?.port();
            tracing::info!(port, "HTTP worker listening");
            registration::announce(&settings.gateway_url, Protocol::Http, port).await;
            http::serve(listener, store, shutdown).await
        }
        Protocol::Tcp => {
            let listener = TcpListener::bind(&addr).await?;
            let port = listener.local_addr()?.port();
            tracing::info!(port, "TCP worker listening");
            registration::announce(&settings.gateway_url, Protocol::Tcp, port).await;
            tcp::run(listener, store, shutdown).await;
            Ok(())
        }
        Protocol::Udp => {
            let socket = UdpSocket::bind(&addr).await?;
            let port = socket.local_addr()?.port();
            tracing::info!(port, "UDP worker listening");
            registration::announce(&settings.gateway_url, Protocol::Udp, port).await;
            udp::run(socket, store, shutdown).await;
            Ok(())
        }
    }
}
