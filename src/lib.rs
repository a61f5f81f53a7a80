//! WHOIS Blob Gateway Library
//!
//! Serves static files embedded in a registry record: the client key
//! selects a record, the request path selects an `rbs$` blob inside it.

pub mod admin;
pub mod blob;
pub mod cache;
pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;

pub use cache::RecordCache;
pub use config::schema::GatewayConfig;
pub use dispatch::RequestDispatcher;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
