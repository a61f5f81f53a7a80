//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::registry::whois::WHOIS_PORT;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Public listener (host and port).
    pub listener: ListenerConfig,

    /// How the client key is derived from a request.
    pub client_key: ClientKeyConfig,

    /// Registry (WHOIS) lookup settings.
    pub registry: RegistryConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,

    /// Administrative listener.
    pub admin: AdminConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host to bind; all interfaces when unset.
    pub host: Option<String>,

    /// Port to bind.
    pub port: u16,
}

impl ListenerConfig {
    /// Host actually bound.
    pub fn bind_host(&self) -> &str {
        self.host.as_deref().unwrap_or("0.0.0.0")
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: 8080,
        }
    }
}

/// Client key derivation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientKeyConfig {
    /// Trusted forwarding header carrying the client address.
    pub header: String,

    /// Key used when the header is absent.
    pub default: Option<String>,
}

impl Default for ClientKeyConfig {
    fn default() -> Self {
        Self {
            header: "x-frontend-ip".to_string(),
            default: None,
        }
    }
}

/// Registry lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Root WHOIS server.
    pub server: String,

    /// Root WHOIS port.
    pub port: u16,

    /// Follow `refer:` style referrals to the authoritative registry.
    pub follow_referrals: bool,

    /// Maximum referral hops after the root query.
    pub max_referrals: u8,

    /// Per-hop timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            server: "whois.iana.org".to_string(),
            port: WHOIS_PORT,
            follow_referrals: true,
            max_referrals: 3,
            timeout_secs: 15,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Prometheus exporter bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Administrative API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Serve the admin API.
    pub enabled: bool,

    /// Admin bind address, separate from the public listener.
    pub bind_address: String,

    /// Bearer token required on every admin route.
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bind_address: "127.0.0.1:8081".to_string(),
            api_key: String::new(),
        }
    }
}
