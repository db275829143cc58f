//! JSON-RPC Admission Gateway Library

pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::schema::GatewayConfig;
pub use gateway::admission::{AdmissionPolicy, MethodRules};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::{HttpRelay, RelayUpstream};
