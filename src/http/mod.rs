//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span)
//!     → server.rs blob_handler (forwarding header, decoded path)
//!     → dispatch (key → record → blob)
//!     → blob::Reply into an HTTP response
//!     → Send to client
//! ```

pub mod server;

pub use server::{decode_path, AppState, GatewayServer, X_REQUEST_ID};
