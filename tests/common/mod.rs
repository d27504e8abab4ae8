//! Shared utilities for integration testing.
//!
//! Spawns a real gateway on loopback ports and in-process workers backed by
//! the in-memory store, mirroring the deployed topology.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, UdpSocket};

use auction_gateway::config::GatewayConfig;
use auction_gateway::ingress;
use auction_gateway::proto::Protocol;
use auction_gateway::store::{InMemoryStore, SharedStore};
use auction_gateway::worker;
use auction_gateway::{GatewayContext, Shutdown};

pub struct TestGateway {
    pub ctx: Arc<GatewayContext>,
    pub http_addr: SocketAddr,
    pub tcp_addr: SocketAddr,
    pub udp_addr: SocketAddr,
    pub shutdown: Shutdown,
}

/// Start a gateway with default config on ephemeral loopback ports.
pub async fn spawn_gateway() -> TestGateway {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1".to_string();
    config.workers.host = "127.0.0.1".to_string();
    // Keep probe budgets short so ejection tests stay fast.
    config.timeouts.probe_ms = 300;
    config.timeouts.probe_udp_ms = 500;
    config.heartbeat.enabled = false;

    let http_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let tcp_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let udp_socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();

    let http_addr = http_listener.local_addr().unwrap();
    let tcp_addr = tcp_listener.local_addr().unwrap();
    let udp_addr = udp_socket.local_addr().unwrap();

    let ctx = GatewayContext::new(config);
    let shutdown = Shutdown::new();

    {
        let ctx = ctx.clone();
        let rx = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = ingress::http::serve(ctx, http_listener, rx).await;
        });
    }
    tokio::spawn(ingress::tcp::run(
        ctx.clone(),
        tcp_listener,
        shutdown.subscribe(),
    ));
    tokio::spawn(ingress::udp::run(
        ctx.clone(),
        udp_socket,
        shutdown.subscribe(),
    ));

    tokio::time::sleep(Duration::from_millis(100)).await;

    TestGateway {
        ctx,
        http_addr,
        tcp_addr,
        udp_addr,
        shutdown,
    }
}

pub fn mem_store() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::new())
}

/// Start an in-process HTTP worker; returns its port. No self-registration.
pub async fn start_http_worker(store: SharedStore, shutdown: &Shutdown) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = worker::http::serve(listener, store, rx).await;
    });
    port
}

/// Start an in-process TCP worker; returns its port. No self-registration.
pub async fn start_tcp_worker(store: SharedStore, shutdown: &Shutdown) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(worker::tcp::run(listener, store, shutdown.subscribe()));
    port
}

/// Start an in-process UDP worker; returns its port. No self-registration.
pub async fn start_udp_worker(store: SharedStore, shutdown: &Shutdown) -> u16 {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();
    tokio::spawn(worker::udp::run(socket, store, shutdown.subscribe()));
    port
}

/// Register a worker through the gateway's own registration endpoint.
pub async fn register(gateway: &TestGateway, protocol: Protocol, port: u16) {
    let response = reqwest::Client::new()
        .post(format!("http://{}/registerServer", gateway.http_addr))
        .body(format!("{};{}", protocol.as_str(), port))
        .send()
        .await
        .expect("gateway unreachable");
    assert_eq!(response.status(), 200);
}

/// A free loopback port with nothing listening on it.
pub async fn dead_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}
