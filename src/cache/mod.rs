//! Record cache subsystem.
//!
//! # Data Flow
//! ```text
//! dispatcher miss
//!     → registry lookup
//!     → record.rs put (whole record or nothing)
//!
//! SIGHUP / POST /admin/cache/invalidate
//!     → record.rs clear (every entry at once)
//! ```
//!
//! # Design Decisions
//! - No TTL and no size bound; growth follows the number of distinct keys
//! - Entries are never refreshed one by one
//! - Handles are cheap clones over one shared map

pub mod record;

pub use record::RecordCache;
