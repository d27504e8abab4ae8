//! Worker self-registration with the gateway.

use crate::proto::Protocol;

/// POST `"<protocol>;<port>"` to the gateway's `/registerServer` endpoint.
///
/// Failure is logged, not fatal: the worker keeps serving and can be
/// registered later (or found by a restarted gateway re-announcement).
pub async fn announce(gateway_url: &str, protocol: Protocol, port: u16) {
    let url = format!("{}/registerServer", gateway_url.trim_end_matches('/'));
    let body = format!("{};{}", protocol.as_str(), port);

    match reqwest::Client::new().post(&url).body(body).send().await {
        Ok(response) if response.status().is_success() => {
            tracing::info!(%protocol, port, "Registered with gateway");
        }
        Ok(response) => {
            tracing::warn!(
                %protocol,
                port,
                status = %response.status(),
                "Gateway rejected registration"
            );
        }
        Err(err) => {
            tracing::warn!(%protocol, port, error = %err, "Could not reach gateway");
        }
    }
}
