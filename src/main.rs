//! Gateway binary.
//!
//! Boots the three ingress listeners, the heartbeat monitor, and the stdin
//! admin loop, then waits for shutdown (`sair` or Ctrl-C).

use std::path::PathBuf;

use clap::Parser;
use tokio::net::{TcpListener, UdpSocket};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auction_gateway::config::{self, GatewayConfig};
use auction_gateway::health::HeartbeatMonitor;
use auction_gateway::{admin, ingress, GatewayContext, Shutdown};

#[derive(Parser, Debug)]
#[command(
    name = "auction-gateway",
    about = "Front-end gateway for the distributed auction backend"
)]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auction_gateway=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("auction-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => GatewayConfig::default(),
    };

    tracing::info!(
        http_port = config.listener.http_port,
        tcp_port = config.listener.tcp_port,
        udp_port = config.listener.udp_port,
        worker_host = %config.workers.host,
        "Configuration loaded"
    );

    let http_listener = TcpListener::bind(config.listener.http_addr()).await?;
    let tcp_listener = TcpListener::bind(config.listener.tcp_addr()).await?;
    let udp_socket = UdpSocket::bind(config.listener.udp_addr()).await?;
    tracing::info!(
        http = %http_listener.local_addr()?,
        tcp = %tcp_listener.local_addr()?,
        udp = %udp_socket.local_addr()?,
        "Listeners bound"
    );

    let ctx = GatewayContext::new(config.clone());
    let shutdown = Shutdown::new();
    // Subscribe before any task can trigger, so the signal is never missed.
    let mut stopping = shutdown.subscribe();
    shutdown.trigger_on_ctrl_c();

    let monitor = HeartbeatMonitor::new(
        ctx.registry.clone(),
        ctx.client.clone(),
        config.heartbeat.clone(),
        config.timeouts.clone(),
    );
    tokio::spawn(monitor.run(shutdown.subscribe()));

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
    {
        let ctx = ctx.clone();
        let rx = shutdown.subscribe();
        tokio::spawn(async move {
            if let Err(err) = ingress::http::serve(ctx, http_listener, rx).await {
                tracing::error!(error = %err, "HTTP ingress failed");
            }
        });
    }

    tokio::spawn(admin::run(ctx.registry.clone(), shutdown.clone()));

    let _ = stopping.recv().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
