//! Blob protocol subsystem.
//!
//! # Data Flow
//! ```text
//! RawRecord + normalized path
//!     → scanner.rs (anchor → header start → terminator → header end)
//!     → payload.rs (strip `remarks:` continuations, trim, base64 if binary)
//!     → reply.rs (Reply::Success / Reply::Failure)
//!     → extractor.rs ties the stages together
//! ```
//!
//! # Design Decisions
//! - Extraction is pure: same record and path, same reply
//! - A failed scan stage is a 404, never a partial reply
//! - Content types are passed through unvalidated
//! - Decode failures propagate to the caller instead of becoming a reply

pub mod extractor;
pub mod payload;
pub mod reply;
pub mod scanner;

pub use extractor::extract;
pub use payload::PayloadError;
pub use reply::Reply;
pub use scanner::{BlobHeader, BlobSpan, NotFound};
