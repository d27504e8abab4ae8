//! UDP ingress.
//!
//! One request per datagram. The handler forwards the payload to a live UDP
//! worker on a transient socket and relays the response datagram back to the
//! original client address. A lost worker datagram surfaces as a timeout
//! error response after the forwarding budget.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::sync::{broadcast, Semaphore};
use tokio::time::timeout;

use crate::error::GatewayError;
use crate::ingress::GatewayContext;
use crate::proto::{responses, Command, Protocol};

/// Receive loop with a bounded handler pool; runs until shutdown.
pub async fn run(
    ctx: Arc<GatewayContext>,
    socket: UdpSocket,
    mut shutdown: broadcast::Receiver<()>,
) {
    let socket = Arc::new(socket);
    let permits = Arc::new(Semaphore::new(ctx.config.listener.max_inflight));
    let mut buf = [0u8; 1024];
    loop {
        let permit = tokio::select! {
            permit = Arc::clone(&permits).acquire_owned() => {
                permit.expect("Semaphore closed unexpectedly")
            }
            _ = shutdown.recv() => break,
        };
        let (len, peer) = tokio::select! {
            received = socket.recv_from(&mut buf) => match received {
                Ok(datagram) => datagram,
                Err(err) => {
                    tracing::error!(error = %err, "UDP receive failed");
                    continue;
                }
            },
            _ = shutdown.recv() => break,
        };

        let payload = String::from_utf8_lossy(&buf[..len]).into_owned();
        let ctx = Arc::clone(&ctx);
        let socket = Arc::clone(&socket);
        tokio::spawn(async move {
            let _permit = permit;
            handle_datagram(&ctx, &socket, payload, peer).await;
        });
    }
    tracing::info!("UDP ingress stopped");
}

async fn handle_datagram(
    ctx: &GatewayContext,
    socket: &UdpSocket,
    payload: String,
    peer: SocketAddr,
) {
    let reply = match Command::parse(payload.trim()) {
        Ok(_) => match forward(ctx, &payload).await {
            Ok(reply) => reply,
            Err(GatewayError::BackendTimeout(budget)) => {
                tracing::error!(?budget, "UDP worker did not answer in time");
                responses::UDP_FORWARD_TIMEOUT.to_string()
            }
            Err(err) => {
                tracing::error!(error = %err, "UDP forwarding failed");
                responses::no_backend(Protocol::Udp)
            }
        },
        Err(err) => {
            tracing::warn!(payload = %payload, error = %err, "Rejected malformed UDP command");
            responses::INVALID_COMMAND.to_string()
        }
    };

    if let Err(err) = socket.send_to(reply.as_bytes(), peer).await {
        tracing::warn!(%peer, error = %err, "UDP reply to client failed");
    }
}

/// Send the payload to a live UDP worker on a transient socket and await its
/// response datagram.
async fn forward(ctx: &GatewayContext, payload: &str) -> Result<String, GatewayError> {
    let endpoint = ctx.dispatcher.next(Protocol::Udp).await?;
    let budget = ctx.config.timeouts.forward();

    let upstream = UdpSocket::bind("0.0.0.0:0").await?;
    upstream
        .send_to(payload.as_bytes(), endpoint.authority())
        .await?;

    let mut buf = [0u8; 1024];
    let (len, _) = timeout(budget, upstream.recv_from(&mut buf))
        .await
        .map_err(|_| GatewayError::BackendTimeout(budget))??;

    Ok(String::from_utf8_lossy(&buf[..len]).into_owned())
}
