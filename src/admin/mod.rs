//! Admin loop on the gateway's stdin.
//!
//! Commands:
//! - `listar`: print the registered endpoints per protocol
//! - `sair`: trigger the broadcast shutdown and stop the loop
//! - `iniciar_<proto>` / `parar_<proto>`: workers run as separate processes
//!   in this deployment, so these only print a pointer to the worker binary
//! - anything else: a warning line, and the loop continues

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::lifecycle::Shutdown;
use crate::proto::Protocol;
use crate::registry::ServiceRegistry;

/// Read admin commands from stdin until `sair` or shutdown.
pub async fn run(registry: Arc<ServiceRegistry>, shutdown: Shutdown) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut on_shutdown = shutdown.subscribe();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(err) => {
                    tracing::error!(error = %err, "Admin stdin failed");
                    break;
                }
            },
            _ = on_shutdown.recv() => break,
        };

        let command = line.trim();
        match command {
            "" => {}
            "sair" => {
                tracing::info!("Admin requested shutdown");
                shutdown.trigger();
                break;
            }
            "listar" => print_registry(&registry),
            _ if command.starts_with("iniciar_") || command.starts_with("parar_") => {
                tracing::warn!(
                    command,
                    "Workers run as separate processes; start or stop them with the `worker` binary"
                );
            }
            _ => tracing::warn!(command, "Unknown admin command"),
        }
    }
}

fn print_registry(registry: &ServiceRegistry) {
    for protocol in Protocol::ALL {
        let snapshot = registry.snapshot(protocol);
        let listing = snapshot
            .iter()
            .map(|e| e.authority())
            .collect::<Vec<_>>()
            .join(", ");
        if listing.is_empty() {
            println!("{protocol}: (nenhum servidor registrado)");
        } else {
            println!("{protocol}: {listing}");
        }
    }
}
