//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! gateway. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the JSON-RPC admission gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream JSON-RPC endpoint.
    pub upstream: UpstreamConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Method admission rules.
    pub admission: AdmissionConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8545").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8545".to_string(),
        }
    }
}

/// Upstream endpoint configuration. Exactly one destination; there is
/// no per-request selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream JSON-RPC endpoint URL (http or https).
    pub endpoint: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8546".to_string(),
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes. 0 disables the limit.
    pub max_content_length: u64,
}

/// Method admission rules.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdmissionConfig {
    /// Methods allowed to relay. Empty means every method is allowed
    /// unless denied.
    pub allowed_methods: Vec<String>,

    /// Methods never relayed. Takes precedence over the allow list.
    pub denied_methods: Vec<String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// End-to-end request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default tracing filter; the RUST_LOG environment variable wins.
    pub log_filter: String,

    /// Whether to expose Prometheus metrics.
    pub metrics_enabled: bool,

    /// Metrics exporter bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "rpc_gateway=debug,tower_http=debug".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9100".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_deserializes() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [upstream]
            endpoint = "http://127.0.0.1:9545"
            "#,
        )
        .unwrap();
        assert_eq!(config.upstream.endpoint, "http://127.0.0.1:9545");
        assert_eq!(config.limits.max_content_length, 0);
        assert!(config.admission.allowed_methods.is_empty());
    }

    #[test]
    fn test_full_config_deserializes() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:8545"

            [upstream]
            endpoint = "https://rpc.example.com"

            [limits]
            max_content_length = 1048576

            [admission]
            allowed_methods = ["eth_chainId", "eth_call"]
            denied_methods = ["admin_shutdown"]

            [timeouts]
            request_secs = 10

            [observability]
            metrics_enabled = true
            "#,
        )
        .unwrap();
        assert_eq!(config.limits.max_content_length, 1_048_576);
        assert_eq!(config.admission.allowed_methods.len(), 2);
        assert_eq!(config.timeouts.request_secs, 10);
        assert!(config.observability.metrics_enabled);
    }
}
