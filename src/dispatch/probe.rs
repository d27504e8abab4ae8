//! Transport-specific liveness probes.
//!
//! One probe per transport, shared by the dispatch path and the heartbeat
//! monitor:
//! - HTTP: `GET /heartbeat`, expecting a 2xx within the probe budget
//! - TCP: connect, send the line `ping`, expect `pong` back
//! - UDP: send a `ping` datagram, expect `Pong` back (case-insensitive)
//!
//! A timeout counts as a failure.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::timeout;

use crate::dispatch::HttpClient;
use crate::proto::command::{PING, PONG_TCP};
use crate::proto::Protocol;
use crate::registry::Endpoint;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("probe timed out")]
    Timeout,
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected HTTP status {0}")]
    BadStatus(u16),
    #[error("unexpected reply `{0}`")]
    UnexpectedReply(String),
    #[error("http probe failed: {0}")]
    Http(String),
}

/// Probe `endpoint` with its transport's liveness request.
pub async fn probe(
    endpoint: &Endpoint,
    client: &HttpClient,
    probe_budget: Duration,
    udp_budget: Duration,
) -> Result<(), ProbeError> {
    match endpoint.protocol {
        Protocol::Http => probe_http(endpoint, client, probe_budget).await,
        Protocol::Tcp => probe_tcp(endpoint, probe_budget).await,
        Protocol::Udp => probe_udp(endpoint, udp_budget).await,
    }
}

async fn probe_http(
    endpoint: &Endpoint,
    client: &HttpClient,
    budget: Duration,
) -> Result<(), ProbeError> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(endpoint.url("/heartbeat"))
        .header("user-agent", "auction-gateway-probe")
        .body(Body::empty())
        .map_err(|e| ProbeError::Http(e.to_string()))?;

    let response = timeout(budget, client.request(request))
        .await
        .map_err(|_| ProbeError::Timeout)?
        .map_err(|e| ProbeError::Http(e.to_string()))?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(ProbeError::BadStatus(response.status().as_u16()))
    }
}

async fn probe_tcp(endpoint: &Endpoint, budget: Duration) -> Result<(), ProbeError> {
    let stream = timeout(budget, TcpStream::connect(endpoint.authority()))
        .await
        .map_err(|_| ProbeError::Timeout)??;

    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut reply = String::new();

    let exchange = async {
        writer.write_all(PING.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        reader.read_line(&mut reply).await?;
        Ok::<(), std::io::Error>(())
    };
    timeout(budget, exchange)
        .await
        .map_err(|_| ProbeError::Timeout)??;

    if reply.trim().eq_ignore_ascii_case(PONG_TCP) {
        Ok(())
    } else {
        Err(ProbeError::UnexpectedReply(reply.trim().to_string()))
    }
}

async fn probe_udp(endpoint: &Endpoint, budget: Duration) -> Result<(), ProbeError> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.send_to(PING.as_bytes(), endpoint.authority()).await?;

    let mut buf = [0u8; 1024];
    let (len, _) = timeout(budget, socket.recv_from(&mut buf))
        .await
        .map_err(|_| ProbeError::Timeout)??;

    let reply = String::from_utf8_lossy(&buf[..len]);
    if reply.trim().eq_ignore_ascii_case(PONG_TCP) {
        Ok(())
    } else {
        Err(ProbeError::UnexpectedReply(reply.trim().to_string()))
    }
}
