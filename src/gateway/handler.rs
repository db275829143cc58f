//! The gateway request pipeline.
//!
//! # Responsibilities
//! - Short-circuit empty GET probes without touching JSON
//! - Enforce the POST-only and content-length gates
//! - Buffer the body (bounded), validate it is one JSON value
//! - Extract the `method` field and consult the admission policy
//! - Relay the original bytes and stream the upstream response back
//!
//! # Design Decisions
//! - The body is decoded twice on purpose: once into raw bytes (so the
//!   upstream receives exactly what arrived, unknown fields included)
//!   and once narrowly for the `method` string
//! - The bounded read truncates at the limit like a limiting reader; a
//!   body that overruns it yields a prefix that fails JSON decoding
//! - The JSON content type is asserted on the response before it is
//!   returned, so headers always precede body bytes

use std::{sync::Arc, time::Instant};

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};
use http_body_util::BodyExt;
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::gateway::admission::AdmissionPolicy;
use crate::gateway::error::GatewayError;
use crate::observability::metrics;
use crate::relay::{RelayUpstream, JSON_CONTENT_TYPE};

/// Per-handler state, fixed at startup and shared across requests.
#[derive(Clone)]
pub struct GatewayState {
    /// Request size limit in bytes; 0 disables the limit.
    pub max_content_length: u64,

    /// Allow/deny decision for RPC method names.
    pub policy: Arc<dyn AdmissionPolicy>,

    /// Forwarder to the one configured upstream.
    pub relay: Arc<dyn RelayUpstream>,
}

/// The subset of the JSON-RPC request the gateway inspects.
///
/// `id`, `params`, and the `jsonrpc` version are opaque and relayed
/// verbatim as part of the raw payload.
#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    method: String,
}

/// Main gateway handler. One linear pass; any failing check terminates
/// the request with a single plain-text error response.
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    match handle(state, request).await {
        Ok(response) => {
            metrics::record_request(response.status(), start);
            response
        }
        Err(err) => {
            metrics::record_request(err.status(), start);
            err.into_response()
        }
    }
}

async fn handle(state: GatewayState, request: Request<Body>) -> Result<Response, GatewayError> {
    // Health-check probes: empty GET with no query string.
    if is_empty_probe(&request) {
        return Ok(StatusCode::OK.into_response());
    }

    if request.method() != Method::POST {
        return Err(GatewayError::MethodNotAllowed);
    }

    // Reject oversized requests up front, before reading the body.
    let declared = declared_content_length(request.headers());
    if state.max_content_length > 0 {
        if let Some(length) = declared {
            if length > state.max_content_length {
                tracing::warn!(
                    declared_length = length,
                    limit = state.max_content_length,
                    "Request exceeds content-length limit"
                );
                return Err(GatewayError::RequestTooLarge);
            }
        }
    }

    // Bounded read: the limit holds even if the declared length lies
    // (chunked encoding, truncated header). Input past the limit is cut
    // off, so an overrunning body fails the JSON decode below.
    let limit = if state.max_content_length > 0 {
        state.max_content_length as usize
    } else {
        usize::MAX
    };
    let payload = collect_limited(request.into_body(), limit)
        .await
        .map_err(GatewayError::BodyRead)?;

    // First decode: exactly one JSON value, raw bytes retained for
    // byte-exact forwarding. Trailing garbage fails here.
    let raw: &RawValue = serde_json::from_slice(&payload).map_err(GatewayError::JsonParse)?;

    // Second decode: only the method name.
    let envelope: RpcEnvelope =
        serde_json::from_str(raw.get()).map_err(GatewayError::MethodDecode)?;

    if !state.policy.should_relay(&envelope.method) {
        tracing::warn!(method = %envelope.method, "Method relay rejected");
        return Err(GatewayError::MethodRejected);
    }

    tracing::debug!(
        method = %envelope.method,
        payload_bytes = payload.len(),
        "Relaying request"
    );

    // Forward the original payload, never a re-serialization.
    let mut response = state.relay.relay(payload).await?;

    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(JSON_CONTENT_TYPE),
    );
    Ok(response)
}

/// True for the GET shape used by health-check probes: zero declared
/// content length (absent counts as zero) and no query string.
fn is_empty_probe(request: &Request<Body>) -> bool {
    request.method() == Method::GET
        && declared_content_length(request.headers()).unwrap_or(0) == 0
        && request.uri().query().is_none()
}

/// Parse the declared `Content-Length`, if present and well-formed.
fn declared_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Collect the body, keeping at most `limit` bytes and discarding the
/// rest (limiting-reader semantics).
async fn collect_limited(mut body: Body, limit: usize) -> Result<Bytes, axum::Error> {
    let mut buf: Vec<u8> = Vec::new();
    while let Some(frame) = body.frame().await {
        let frame = frame?;
        if let Ok(data) = frame.into_data() {
            let remaining = limit - buf.len();
            if data.len() >= remaining {
                buf.extend_from_slice(&data[..remaining]);
                break;
            }
            buf.extend_from_slice(&data);
        }
    }
    Ok(Bytes::from(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_get_is_probe() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("http://gateway.local/")
            .body(Body::default())
            .unwrap();
        assert!(is_empty_probe(&req));
    }

    #[test]
    fn test_get_with_query_is_not_probe() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("http://gateway.local/?debug=1")
            .body(Body::default())
            .unwrap();
        assert!(!is_empty_probe(&req));
    }

    #[test]
    fn test_get_with_declared_body_is_not_probe() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("http://gateway.local/")
            .header(header::CONTENT_LENGTH, "12")
            .body(Body::default())
            .unwrap();
        assert!(!is_empty_probe(&req));
    }

    #[test]
    fn test_post_is_not_probe() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("http://gateway.local/")
            .body(Body::default())
            .unwrap();
        assert!(!is_empty_probe(&req));
    }

    #[test]
    fn test_declared_content_length() {
        let mut headers = HeaderMap::new();
        assert_eq!(declared_content_length(&headers), None);

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("42"));
        assert_eq!(declared_content_length(&headers), Some(42));

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("nope"));
        assert_eq!(declared_content_length(&headers), None);
    }

    #[tokio::test]
    async fn test_collect_limited_truncates_at_limit() {
        let body = Body::from("0123456789abcdef");
        let bytes = collect_limited(body, 8).await.unwrap();
        assert_eq!(&bytes[..], b"01234567");
    }

    #[tokio::test]
    async fn test_collect_limited_unbounded() {
        let body = Body::from("0123456789abcdef");
        let bytes = collect_limited(body, usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"0123456789abcdef");
    }

    #[test]
    fn test_envelope_rejects_missing_method() {
        assert!(serde_json::from_str::<RpcEnvelope>(r#"{"id":1}"#).is_err());
        assert!(serde_json::from_str::<RpcEnvelope>(r#"{"method":7}"#).is_err());
        let env: RpcEnvelope =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"method":"eth_chainId"}"#).unwrap();
        assert_eq!(env.method, "eth_chainId");
    }
}
