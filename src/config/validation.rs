//! Configuration validation.
//!
//! Serde handles syntax; this module checks the values that serde accepts
//! but the gateway cannot run with. All problems are reported, not just the
//! first.

use axum::http::HeaderName;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Check a configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.client_key.header.is_empty() {
        errors.push(ValidationError::new("client_key.header", "must not be empty"));
    } else if HeaderName::try_from(config.client_key.header.as_str()).is_err() {
        errors.push(ValidationError::new(
            "client_key.header",
            format!("'{}' is not a valid header name", config.client_key.header),
        ));
    }

    if config.registry.server.trim().is_empty() {
        errors.push(ValidationError::new("registry.server", "must not be empty"));
    }
    if config.registry.timeout_secs == 0 {
        errors.push(ValidationError::new("registry.timeout_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if config.admin.enabled {
        if config.admin.bind_address.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::new(
                "admin.bind_address",
                format!("'{}' is not a socket address", config.admin.bind_address),
            ));
        }
        if config.admin.api_key.is_empty() {
            errors.push(ValidationError::new(
                "admin.api_key",
                "must be set when the admin API is enabled",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
