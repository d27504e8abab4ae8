//! Datagram UDP worker transport.
//!
//! One request per datagram, ≤ 1024 bytes. A `ping` payload is the liveness
//! probe and is answered with `Pong` without touching the store.

use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::sync::broadcast;

use crate::proto::command::{PING, PONG_UDP};
use crate::proto::{responses, Command};
use crate::store::SharedStore;
use crate::worker::handler;

/// Receive loop; runs until the shutdown signal fires.
pub async fn run(socket: UdpSocket, store: SharedStore, mut shutdown: broadcast::Receiver<()>) {
    let socket = Arc::new(socket);
    let mut buf = [0u8; 1024];
    loop {
        tokio::select! {
            received = socket.recv_from(&mut buf) => {
                match received {
                    Ok((len, peer)) => {
                        let payload = String::from_utf8_lossy(&buf[..len]).into_owned();
                        let socket = Arc::clone(&socket);
                        let store = store.clone();
                        tokio::spawn(async move {
                            let reply = respond(&store, payload.trim()).await;
                            if let Err(err) = socket.send_to(reply.as_bytes(), peer).await {
                                tracing::warn!(%peer, error = %err, "UDP reply failed");
                            }
                        });
                    }
                    Err(err) => tracing::error!(error = %err, "UDP receive failed"),
                }
            }
            _ = shutdown.recv() => {
                tracing::info!("UDP worker received shutdown signal");
                break;
            }
        }
    }
}

async fn respond(store: &SharedStore, payload: &str) -> String {
    if payload.eq_ignore_ascii_case(PING) {
        return PONG_UDP.to_string();
    }
    match Command::parse(payload) {
        Ok(command) => match handler::execute(store, &command).await {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(error = %err, "Store failure");
                handler::failure_line(&err).to_string()
            }
        },
        Err(err) => {
            tracing::warn!(error = %err, "Rejected malformed UDP command");
            responses::INVALID_COMMAND.to_string()
        }
    }
}
