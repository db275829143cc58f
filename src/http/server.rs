//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the gateway handler on every path
//! - Wire up middleware (tracing, request timeout)
//! - Serve on a caller-supplied listener with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{StatusCode, Uri},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::gateway::{gateway_handler, GatewayState, MethodRules};
use crate::lifecycle::ShutdownListener;
use crate::relay::HttpRelay;

/// HTTP server for the admission gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given (validated) configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, axum::http::uri::InvalidUri> {
        let endpoint: Uri = config.upstream.endpoint.parse()?;

        let state = GatewayState {
            max_content_length: config.limits.max_content_length,
            policy: Arc::new(MethodRules::from_config(&config.admission)),
            relay: Arc::new(HttpRelay::new(endpoint)),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The gateway accepts any path; JSON-RPC clients disagree about
    /// whether to post to "/" or a vanity path.
    fn build_router(config: &GatewayConfig, state: GatewayState) -> Router {
        Router::new()
            .route("/", any(gateway_handler))
            .route("/{*path}", any(gateway_handler))
            .with_state(state)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until shutdown is signalled or Ctrl-C arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownListener,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.endpoint,
            "Gateway server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    () = shutdown.recv() => {}
                    () = crate::lifecycle::signals::shutdown_signal() => {}
                }
            })
            .await?;

        tracing::info!("Gateway server stopped");
        Ok(())
    }
}
