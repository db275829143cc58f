//! Gateway request pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound HTTP request
//!     → handler.rs (probe short-circuit, method/size gates)
//!     → handler.rs (bounded body read, JSON decode, method extraction)
//!     → admission.rs (allow/deny decision on the method name)
//!     → relay (forward raw bytes, stream response back)
//!     → error.rs (failed checks become one plain-text error response)
//! ```
//!
//! # Design Decisions
//! - The handler is stateless across requests; its fields are fixed at
//!   startup and shared via Arc
//! - The original request bytes are forwarded verbatim, never rebuilt
//!   from parsed fields
//! - Any failing check is terminal; there is no retry at any layer

pub mod admission;
pub mod error;
pub mod handler;

pub use admission::{AdmissionPolicy, MethodRules};
pub use error::GatewayError;
pub use handler::{gateway_handler, GatewayState};
