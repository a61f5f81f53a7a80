//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the blob handler on every path
//! - Wire up middleware (request ID, tracing)
//! - Percent-decode the path before dispatch
//! - Serve until the shutdown signal fires

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::borrow::Cow;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::dispatch::RequestDispatcher;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;

/// Header carrying the per-request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: RequestDispatcher,
    /// Trusted forwarding header holding the client key.
    pub client_key_header: String,
}

/// Public HTTP server for registry blobs.
pub struct GatewayServer {
    router: Router,
}

impl GatewayServer {
    /// Create a new server around a dispatcher.
    pub fn new(config: &GatewayConfig, dispatcher: RequestDispatcher) -> Self {
        let state = AppState {
            dispatcher,
            client_key_header: config.client_key.header.clone(),
        };

        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "request",
                request_id = %request_id,
                method = %request.method(),
                path = %request.uri().path(),
            )
        });

        Router::new()
            .route("/", any(blob_handler))
            .route("/{*path}", any(blob_handler))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(trace)
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The router, for serving on a custom transport or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Percent-decode a request path. Paths that do not decode to UTF-8 are kept raw.
pub fn decode_path(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

/// Serve the blob for the request path, whatever the method.
async fn blob_handler(State(state): State<AppState>, headers: HeaderMap, uri: Uri) -> Response {
    let start = Instant::now();

    let forwarded = headers
        .get(state.client_key_header.as_str())
        .and_then(|v| v.to_str().ok());
    let path = decode_path(uri.path());

    tracing::debug!(client_key = ?forwarded, path = %path, "Dispatching request");

    let response = state
        .dispatcher
        .dispatch(forwarded, &path)
        .await
        .into_response();

    metrics::record_request(response.status().as_u16(), start);
    response
}
