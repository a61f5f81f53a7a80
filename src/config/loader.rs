//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::{GatewayConfig, LogFormat};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid environment variable {name}: {reason}")]
    Env { name: &'static str, reason: String },

    #[error(
        "Validation failed: {}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    )]
    Validation(Vec<ValidationError>),
}

/// Load configuration: file (if any), then environment overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => GatewayConfig::default(),
    };

    apply_env(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML document without validating it.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Apply environment overrides. Empty variables count as unset.
///
/// `HOST` doubles as the default client key unless `DEFAULT_CLIENT_KEY` is set.
pub fn apply_env<F>(config: &mut GatewayConfig, var: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| var(name).filter(|value| !value.is_empty());

    if let Some(host) = var("HOST") {
        config.listener.host = Some(host.clone());
        if config.client_key.default.is_none() {
            config.client_key.default = Some(host);
        }
    }

    if let Some(port) = var("PORT") {
        config.listener.port = port.parse().map_err(|e| ConfigError::Env {
            name: "PORT",
            reason: format!("'{port}': {e}"),
        })?;
    }

    if let Some(header) = var("CLIENT_KEY_HEADER") {
        config.client_key.header = header;
    }

    if let Some(key) = var("DEFAULT_CLIENT_KEY") {
        config.client_key.default = Some(key);
    }

    if let Some(server) = var("WHOIS_SERVER") {
        config.registry.server = server;
    }

    if let Some(format) = var("LOG_FORMAT") {
        config.observability.log_format = match format.to_ascii_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::Env {
                    name: "LOG_FORMAT",
                    reason: format!("'{other}' is not one of pretty, json"),
                })
            }
        };
    }

    if let Some(key) = var("ADMIN_API_KEY") {
        config.admin.api_key = key;
    }

    Ok(())
}
