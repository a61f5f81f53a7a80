//! Registry lookup subsystem.
//!
//! # Data Flow
//! ```text
//! client key (IP address)
//!     → whois.rs query root server (whois.iana.org:43)
//!     → follow `refer:` / `whois:` / `ReferralServer:` hops
//!     → raw record text
//! ```
//!
//! # Design Decisions
//! - The dispatcher only sees the `RegistryLookup` trait
//! - Every failure is one `LookupError`; callers do not retry
//! - Each hop has its own timeout; the dispatcher adds none

pub mod whois;

use async_trait::async_trait;
use thiserror::Error;

pub use whois::WhoisClient;

/// Errors from a registry lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Could not reach the registry server.
    #[error("failed to connect to {server}: {source}")]
    Connect {
        server: String,
        #[source]
        source: std::io::Error,
    },

    /// The connection failed mid-exchange.
    #[error("I/O error talking to {server}: {source}")]
    Io {
        server: String,
        #[source]
        source: std::io::Error,
    },

    /// The server did not answer in time.
    #[error("query to {server} timed out")]
    Timeout { server: String },

    /// The server answered with nothing.
    #[error("empty response from {server}")]
    Empty { server: String },
}

/// Resolves a client key to its raw registry record.
#[async_trait]
pub trait RegistryLookup: Send + Sync {
    async fn lookup(&self, client_key: &str) -> Result<String, LookupError>;
}
