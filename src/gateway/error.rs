//! Gateway error taxonomy and HTTP status mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::relay::RelayError;

/// Errors that terminate a gateway request.
///
/// Every variant maps to exactly one client-visible status; bodies are
/// plain text, never JSON-RPC-shaped.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Inbound HTTP method was not POST (and not the empty-GET probe).
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Declared content length exceeded the configured limit.
    #[error("request too large")]
    RequestTooLarge,

    /// The request body could not be read from the client.
    #[error("failed to read request body: {0}")]
    BodyRead(axum::Error),

    /// The body was not a single valid JSON value.
    #[error("JSON parse error: {0}")]
    JsonParse(serde_json::Error),

    /// The `method` field was missing or not a string.
    #[error("method decode error: {0}")]
    MethodDecode(serde_json::Error),

    /// The admission policy denied the method.
    #[error("method relay rejected")]
    MethodRejected,

    /// The upstream call failed before any response bytes were streamed.
    #[error("failed to relay: {0}")]
    Relay(#[from] RelayError),
}

impl GatewayError {
    /// The HTTP status this error surfaces as.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::RequestTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::BodyRead(_)
            | GatewayError::JsonParse(_)
            | GatewayError::MethodDecode(_) => StatusCode::BAD_REQUEST,
            GatewayError::MethodRejected => StatusCode::FORBIDDEN,
            GatewayError::Relay(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
