//! TCP ingress.
//!
//! Each accepted connection carries one newline-terminated command. The
//! handler dispatches to a live TCP worker, relays the worker's single
//! response line, and closes.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, Semaphore};
use tokio::time::timeout;

use crate::error::GatewayError;
use crate::ingress::GatewayContext;
use crate::proto::{responses, Command, Protocol};

/// Accept loop with a bounded handler pool; runs until shutdown.
pub async fn run(
    ctx: Arc<GatewayContext>,
    listener: TcpListener,
    mut shutdown: broadcast::Receiver<()>,
) {
    let permits = Arc::new(Semaphore::new(ctx.config.listener.max_inflight));
    loop {
        // Acquire the pool slot before accepting (backpressure).
        let permit = tokio::select! {
            permit = Arc::clone(&permits).acquire_owned() => {
                permit.expect("Semaphore closed unexpectedly")
            }
            _ = shutdown.recv() => break,
        };
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(err) => {
                    tracing::error!(error = %err, "TCP accept failed");
                    continue;
                }
            },
            _ = shutdown.recv() => break,
        };

        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            let _permit = permit;
            if let Err(err) = handle_connection(&ctx, stream).await {
                tracing::warn!(%peer, error = %err, "TCP client connection failed");
            }
        });
    }
    tracing::info!("TCP ingress stopped");
}

async fn handle_connection(ctx: &GatewayContext, stream: TcpStream) -> std::io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut line = String::new();
    BufReader::new(reader).read_line(&mut line).await?;

    let request = line.trim();
    if request.is_empty() {
        tracing::warn!("Empty TCP request");
        return Ok(());
    }

    let reply = match Command::parse(request) {
        Ok(_) => match forward(ctx, request).await {
            Ok(reply) => reply,
            Err(GatewayError::NoBackend(protocol)) => {
                tracing::error!(%protocol, "No live worker for TCP request");
                responses::no_backend(protocol)
            }
            Err(GatewayError::BackendTimeout(budget)) => {
                tracing::error!(?budget, "TCP worker did not answer in time");
                responses::TCP_FORWARD_TIMEOUT.to_string()
            }
            Err(err) => {
                tracing::error!(error = %err, "TCP forwarding failed");
                responses::TCP_FORWARD_FAILED.to_string()
            }
        },
        Err(err) => {
            tracing::warn!(request, error = %err, "Rejected malformed TCP command");
            responses::INVALID_COMMAND.to_string()
        }
    };

    writer.write_all(reply.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

/// Open a transient connection to a live TCP worker, send the command line,
/// and read back the single response line.
async fn forward(ctx: &GatewayContext, request: &str) -> Result<String, GatewayError> {
    let endpoint = ctx.dispatcher.next(Protocol::Tcp).await?;
    let budget = ctx.config.timeouts.forward();

    let exchange = async {
        let stream = TcpStream::connect(endpoint.authority()).await?;
        let (reader, mut writer) = stream.into_split();
        writer.write_all(request.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;

        let mut reply = String::new();
        BufReader::new(reader).read_line(&mut reply).await?;
        Ok::<String, std::io::Error>(reply.trim_end().to_string())
    };

    match timeout(budget, exchange).await {
        Ok(Ok(reply)) => Ok(reply),
        Ok(Err(err)) => Err(GatewayError::Io(err)),
        Err(_) => Err(GatewayError::BackendTimeout(budget)),
    }
}
