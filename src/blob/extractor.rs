//! Record + path → reply.

use crate::blob::payload::{self, PayloadError};
use crate::blob::reply::Reply;
use crate::blob::scanner;

/// Extract the blob served under `path` from a raw registry record.
///
/// Every scan failure is a 404. A located binary payload that is not valid
/// base64 is returned as an error for the caller to map.
pub fn extract(record: &str, path: &str) -> Result<Reply, PayloadError> {
    let span = match scanner::locate(record, path) {
        Ok(span) => span,
        Err(stage) => {
            tracing::debug!(path = %path, stage = %stage, "No blob for path");
            return Ok(Reply::not_found());
        }
    };

    let content_type = span.header.content_type;
    let body = payload::decode(payload::normalize(span.payload), content_type)?;

    Ok(Reply::ok(body, content_type))
}
