//! Payload normalization and decoding.

use axum::body::Bytes;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use thiserror::Error;

/// Registry continuation prefix stripped from payload lines.
pub const CONTINUATION_PREFIX: &str = "remarks:";

/// Standard alphabet, padding optional.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Errors raised while decoding a located payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Remove every `remarks:` followed by at least one whitespace character,
/// then trim the result.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(ix) = rest.find(CONTINUATION_PREFIX) {
        let after = &rest[ix + CONTINUATION_PREFIX.len()..];
        let stripped = after.trim_start();

        if stripped.len() < after.len() {
            out.push_str(&rest[..ix]);
            rest = stripped;
        } else {
            // `remarks:` glued to the next token is content, not a continuation.
            out.push_str(&rest[..ix + CONTINUATION_PREFIX.len()]);
            rest = after;
        }
    }
    out.push_str(rest);

    out.trim().to_owned()
}

/// Decode a normalized payload according to its declared content type.
///
/// `text*` types are served as-is. Anything else is base64, with embedded
/// ASCII whitespace ignored.
pub fn decode(normalized: String, content_type: &str) -> Result<Bytes, PayloadError> {
    if content_type.starts_with("text") {
        return Ok(Bytes::from(normalized));
    }

    let compact: Vec<u8> = normalized
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    Ok(Bytes::from(BASE64.decode(compact)?))
}
