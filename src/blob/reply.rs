//! Reply description produced by the blob pipeline.

use axum::{
    body::Bytes,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// What gets written back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A located blob with its declared content type.
    Success {
        status: StatusCode,
        body: Bytes,
        content_type: String,
    },
    /// A bare status with no body.
    Failure { status: StatusCode },
}

impl Reply {
    pub fn ok(body: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Reply::Success {
            status: StatusCode::OK,
            body: body.into(),
            content_type: content_type.into(),
        }
    }

    pub fn failure(status: StatusCode) -> Self {
        Reply::Failure { status }
    }

    pub fn not_found() -> Self {
        Self::failure(StatusCode::NOT_FOUND)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Reply::Success { status, .. } | Reply::Failure { status } => *status,
        }
    }

    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Reply::Success { body, .. } => Some(body),
            Reply::Failure { .. } => None,
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        match self {
            Reply::Success { content_type, .. } => Some(content_type),
            Reply::Failure { .. } => None,
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Failure { status } => status.into_response(),
            Reply::Success {
                status,
                body,
                content_type,
            } => match HeaderValue::from_str(&content_type) {
                Ok(value) => (status, [(header::CONTENT_TYPE, value)], body).into_response(),
                Err(_) => {
                    tracing::warn!(
                        content_type = %content_type.escape_debug(),
                        "Declared content type is not a valid header value"
                    );
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_success_response() {
        let response = Reply::ok("HELLO", "text/plain").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"HELLO");
    }

    #[tokio::test]
    async fn test_failure_response_has_no_body() {
        let response = Reply::not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn test_illegal_content_type_becomes_500() {
        let response = Reply::ok("x", "text/plain\nx-injected: 1").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_accessors() {
        let reply = Reply::ok("x", "text/plain");
        assert_eq!(reply.status(), StatusCode::OK);
        assert_eq!(reply.content_type(), Some("text/plain"));
        assert_eq!(reply.body().map(|b| &b[..]), Some(&b"x"[..]));

        let reply = Reply::failure(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.body(), None);
        assert_eq!(reply.content_type(), None);
    }
}
