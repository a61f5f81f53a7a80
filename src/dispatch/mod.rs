//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! forwarding header + decoded path
//!     → ResolveKey (header, else configured default)
//!     → LookupOrCache (RecordCache, else RegistryLookup then put)
//!     → NormalizePath ("/" → "/index.html")
//!     → Extract (blob::extract)
//!     → Reply
//! ```
//!
//! # Design Decisions
//! - The registry call is the only await between request start and reply
//! - The cache is written only after a successful lookup resumes
//! - Concurrent misses for one key may both look up; last put wins
//! - No retries; failures map straight to a bare status

pub mod dispatcher;

pub use dispatcher::{normalize_path, DispatchError, RequestDispatcher};
