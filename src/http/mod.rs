//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware layers)
//!     → gateway handler (admission pipeline)
//!     → relay (upstream call)
//!     → response streamed to client
//! ```

pub mod server;

pub use server::HttpServer;
