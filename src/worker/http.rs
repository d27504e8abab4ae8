//! HTTP worker transport.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::proto::{responses, Command};
use crate::store::{SharedStore, StoreError};
use crate::worker::handler;

/// Build the worker's router: the two operations plus the probe endpoint.
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/cadastrarItem", post(register_item))
        .route("/registrarLance", post(place_bid))
        .route("/heartbeat", get(heartbeat))
        .with_state(store)
}

/// Serve until the shutdown signal fires.
pub async fn serve(
    listener: TcpListener,
    store: SharedStore,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    axum::serve(listener, router(store))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await
}

async fn heartbeat() -> StatusCode {
    StatusCode::OK
}

async fn register_item(State(store): State<SharedStore>, body: String) -> (StatusCode, String) {
    match Command::parse_register_args(&body) {
        Ok(command) => respond(&store, &command).await,
        Err(err) => {
            tracing::warn!(error = %err, "Rejected malformed item registration");
            (
                StatusCode::BAD_REQUEST,
                responses::INVALID_COMMAND.to_string(),
            )
        }
    }
}

async fn place_bid(State(store): State<SharedStore>, body: String) -> (StatusCode, String) {
    match Command::parse_bid_args(&body) {
        Ok(command) => respond(&store, &command).await,
        Err(err) => {
            tracing::warn!(error = %err, "Rejected malformed bid");
            (
                StatusCode::BAD_REQUEST,
                responses::INVALID_COMMAND.to_string(),
            )
        }
    }
}

async fn respond(store: &SharedStore, command: &Command) -> (StatusCode, String) {
    match handler::execute(store, command).await {
        Ok(body) => (StatusCode::OK, body),
        Err(StoreError::InvalidArgument(reason)) => {
            tracing::warn!(%reason, "Rejected invalid arguments");
            (
                StatusCode::BAD_REQUEST,
                responses::INVALID_COMMAND.to_string(),
            )
        }
        Err(err) => {
            tracing::error!(error = %err, "Store failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                responses::INTERNAL_ERROR.to_string(),
            )
        }
    }
}
