//! Line-oriented TCP worker transport.
//!
//! One newline-terminated command per connection; the line `ping` is the
//! liveness probe and is answered with `pong` without touching the store.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;

use crate::proto::command::{PING, PONG_TCP};
use crate::proto::{responses, Command};
use crate::store::SharedStore;
use crate::worker::handler;

/// Accept loop; runs until the shutdown signal fires.
pub async fn run(listener: TcpListener, store: SharedStore, mut shutdown: broadcast::Receiver<()>) {
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        let store = store.clone();
                        tokio::spawn(async move {
                            if let Err(err) = serve_connection(stream, &store).await {
                                tracing::warn!(%peer, error = %err, "TCP connection failed");
                            }
                        });
                    }
                    Err(err) => tracing::error!(error = %err, "TCP accept failed"),
                }
            }
            _ = shutdown.recv() => {
                tracing::info!("TCP worker received shutdown signal");
                break;
            }
        }
    }
}

async fn serve_connection(stream: TcpStream, store: &SharedStore) -> std::io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut line = String::new();
    BufReader::new(reader).read_line(&mut line).await?;

    let request = line.trim();
    if request.is_empty() {
        tracing::warn!("Empty TCP request");
        return Ok(());
    }

    let reply = if request.eq_ignore_ascii_case(PING) {
        PONG_TCP.to_string()
    } else {
        match Command::parse(request) {
            Ok(command) => match handler::execute(store, &command).await {
                Ok(body) => body,
                Err(err) => {
                    tracing::error!(error = %err, "Store failure");
                    handler::failure_line(&err).to_string()
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "Rejected malformed TCP command");
                responses::INVALID_COMMAND.to_string()
            }
        }
    };

    writer.write_all(reply.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}
