//! Upstream relay client.
//!
//! # Responsibilities
//! - Forward an admitted JSON-RPC payload to the configured upstream
//! - Stream the upstream response body back without buffering it whole
//! - Surface transport failures to the caller for status mapping
//!
//! # Design Decisions
//! - One fixed endpoint for the lifetime of the relay; no discovery
//! - No retries and no timeout of its own; cancellation propagates by
//!   dropping the request future
//! - The pooled client is safe for concurrent reuse across requests

use axum::{
    body::{Body, Bytes},
    http::{header, Method, Request, Response, Uri},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

/// Content type sent upstream and asserted on gateway responses.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Errors that can occur while relaying to the upstream.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The outbound request could not be constructed.
    #[error("failed to build upstream request: {0}")]
    BuildRequest(#[from] axum::http::Error),

    /// The outbound call failed at the transport level (connection
    /// refused, DNS failure, cancellation).
    #[error("upstream request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),
}

/// Forwarding seam between the gateway handler and the upstream.
///
/// Injected as a trait object so the handler can be exercised against a
/// fake upstream in tests.
#[async_trait::async_trait]
pub trait RelayUpstream: Send + Sync {
    /// Forward `payload` to the upstream and return its response.
    ///
    /// The response body is a stream; bytes flow to the caller as the
    /// upstream produces them. Once streaming to the client has begun
    /// the status line is committed, so a mid-stream failure cannot be
    /// turned into a clean error response; the connection just ends.
    async fn relay(&self, payload: Bytes) -> Result<Response<Body>, RelayError>;
}

/// HTTP relay to one fixed JSON-RPC endpoint.
pub struct HttpRelay {
    endpoint: Uri,
    client: Client<HttpConnector, Body>,
}

impl HttpRelay {
    /// Create a relay for the given upstream endpoint.
    pub fn new(endpoint: Uri) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { endpoint, client }
    }
}

#[async_trait::async_trait]
impl RelayUpstream for HttpRelay {
    async fn relay(&self, payload: Bytes) -> Result<Response<Body>, RelayError> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(self.endpoint.clone())
            .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(header::ACCEPT, JSON_CONTENT_TYPE)
            .body(Body::from(payload))?;

        let response = self.client.request(request).await?;

        tracing::debug!(
            endpoint = %self.endpoint,
            status = %response.status(),
            "Upstream responded"
        );

        // Hand the body back as a stream; no whole-response buffering.
        let (parts, incoming) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(incoming)))
    }
}
