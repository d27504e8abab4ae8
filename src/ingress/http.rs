//! HTTP ingress.
//!
//! Routes:
//! - `POST /cadastrarItem`, `POST /registrarLance`: validated and forwarded
//!   verbatim to a live HTTP worker; the worker's status and body are relayed
//! - `POST /registerServer`: worker self-registration (`protocol;port`)
//! - `GET /servidoresHTTPAtivos`: the live HTTP worker URLs joined by `;`

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Method, Request, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::time::timeout;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::error::GatewayError;
use crate::ingress::GatewayContext;
use crate::proto::command::parse_registration;
use crate::proto::{responses, Command, Protocol};
use crate::registry::Endpoint;

/// Largest worker response body the gateway will relay.
const MAX_RELAY_BODY: usize = 64 * 1024;

/// Build the ingress router.
pub fn router(ctx: Arc<GatewayContext>) -> Router {
    let max_inflight = ctx.config.listener.max_inflight;
    Router::new()
        .route("/cadastrarItem", post(register_item))
        .route("/registrarLance", post(place_bid))
        .route("/registerServer", post(register_server))
        .route("/servidoresHTTPAtivos", get(active_http_workers))
        .with_state(ctx)
        .layer(GlobalConcurrencyLimitLayer::new(max_inflight))
        .layer(TraceLayer::new_for_http())
}

/// Serve the HTTP ingress until the shutdown signal fires.
pub async fn serve(
    ctx: Arc<GatewayContext>,
    listener: TcpListener,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await
}

async fn register_item(
    State(ctx): State<Arc<GatewayContext>>,
    body: String,
) -> (StatusCode, String) {
    if let Err(err) = Command::parse_register_args(&body) {
        tracing::warn!(error = %err, "Rejected malformed item registration");
        return (
            StatusCode::BAD_REQUEST,
            responses::INVALID_COMMAND.to_string(),
        );
    }
    forward(&ctx, "/cadastrarItem", body).await
}

async fn place_bid(State(ctx): State<Arc<GatewayContext>>, body: String) -> (StatusCode, String) {
    if let Err(err) = Command::parse_bid_args(&body) {
        tracing::warn!(error = %err, "Rejected malformed bid");
        return (
            StatusCode::BAD_REQUEST,
            responses::INVALID_COMMAND.to_string(),
        );
    }
    forward(&ctx, "/registrarLance", body).await
}

/// Dispatch to a live HTTP worker and relay its response.
async fn forward(ctx: &GatewayContext, path: &str, body: String) -> (StatusCode, String) {
    match forward_inner(ctx, path, body).await {
        Ok(relayed) => relayed,
        Err(err) => {
            tracing::error!(path, error = %err, "HTTP forwarding failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                responses::no_backend(Protocol::Http),
            )
        }
    }
}

async fn forward_inner(
    ctx: &GatewayContext,
    path: &str,
    body: String,
) -> Result<(StatusCode, String), GatewayError> {
    let endpoint = ctx.dispatcher.next(Protocol::Http).await?;

    let request = Request::builder()
        .method(Method::POST)
        .uri(endpoint.url(path))
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from(body))
        .map_err(|e| GatewayError::BackendFailure(e.to_string()))?;

    let budget = ctx.config.timeouts.forward();
    let response = timeout(budget, ctx.client.request(request))
        .await
        .map_err(|_| GatewayError::BackendTimeout(budget))?
        .map_err(|e| GatewayError::BackendFailure(e.to_string()))?;

    let status = response.status();
    let bytes = axum::body::to_bytes(Body::new(response.into_body()), MAX_RELAY_BODY)
        .await
        .map_err(|e| GatewayError::BackendFailure(e.to_string()))?;

    Ok((status, String::from_utf8_lossy(&bytes).into_owned()))
}

async fn register_server(
    State(ctx): State<Arc<GatewayContext>>,
    body: String,
) -> (StatusCode, String) {
    match parse_registration(&body) {
        Ok((protocol, port)) => {
            let endpoint = Endpoint::new(protocol, ctx.config.workers.host.clone(), port);
            ctx.registry.register(endpoint);
            (StatusCode::OK, responses::server_registered(protocol, port))
        }
        Err(err) => {
            tracing::warn!(body = %body, error = %err, "Rejected malformed registration");
            (
                StatusCode::BAD_REQUEST,
                responses::INVALID_REGISTRATION.to_string(),
            )
        }
    }
}

async fn active_http_workers(State(ctx): State<Arc<GatewayContext>>) -> (StatusCode, String) {
    let listing = ctx
        .registry
        .snapshot(Protocol::Http)
        .iter()
        .map(Endpoint::base_url)
        .collect::<Vec<_>>()
        .join(";");
    (StatusCode::OK, listing)
}
