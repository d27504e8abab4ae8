//! Configuration validation.
//!
//! Serde handles the syntactic half; this module runs the semantic checks
//! and returns all violations at once rather than the first.

use std::fmt;

use crate::config::schema::GatewayConfig;

/// A single semantic violation found in a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a loaded config. Pure function, no I/O.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let ports = [
        ("listener.http_port", config.listener.http_port),
        ("listener.tcp_port", config.listener.tcp_port),
        ("listener.udp_port", config.listener.udp_port),
    ];
    for (field, port) in ports {
        if port == 0 {
            errors.push(ValidationError {
                field,
                message: "port must be non-zero".to_string(),
            });
        }
    }
    if config.listener.http_port == config.listener.tcp_port
        || config.listener.http_port == config.listener.udp_port
    {
        errors.push(ValidationError {
            field: "listener",
            message: "HTTP port collides with another listener port".to_string(),
        });
    }

    if config.listener.bind_address.trim().is_empty() {
        errors.push(ValidationError {
            field: "listener.bind_address",
            message: "must not be empty".to_string(),
        });
    }

    if config.listener.max_inflight == 0 {
        errors.push(ValidationError {
            field: "listener.max_inflight",
            message: "must be at least 1".to_string(),
        });
    }

    if config.workers.host.trim().is_empty() {
        errors.push(ValidationError {
            field: "workers.host",
            message: "must not be empty".to_string(),
        });
    }

    if config.heartbeat.interval_secs == 0 {
        errors.push(ValidationError {
            field: "heartbeat.interval_secs",
            message: "must be at least 1".to_string(),
        });
    }

    for (field, value) in [
        ("timeouts.probe_ms", config.timeouts.probe_ms),
        ("timeouts.probe_udp_ms", config.timeouts.probe_udp_ms),
        ("timeouts.forward_ms", config.timeouts.forward_ms),
    ] {
        if value == 0 {
            errors.push(ValidationError {
                field,
                message: "timeout must be non-zero".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_violation() {
        let mut config = GatewayConfig::default();
        config.listener.max_inflight = 0;
        config.heartbeat.interval_secs = 0;
        config.workers.host = " ".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn rejects_colliding_ports() {
        let mut config = GatewayConfig::default();
        config.listener.tcp_port = config.listener.http_port;
        assert!(validate_config(&config).is_err());
    }
}
