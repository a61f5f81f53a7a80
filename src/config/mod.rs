//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! gateway.toml (optional, --config / GATEWAY_CONFIG)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (HOST, PORT, DEFAULT_CLIENT_KEY, ... overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; SIGHUP clears the cache, it does not reload
//! - All fields have defaults, so no file is needed at all
//! - Environment wins over the file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AdminConfig, ClientKeyConfig, GatewayConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    RegistryConfig,
};
pub use validation::ValidationError;
