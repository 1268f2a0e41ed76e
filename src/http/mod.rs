//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all route)
//!     → request.rs (request id for log correlation)
//!     → Balancer::select()
//!     → forward.rs (rebuild request, stream to backend)
//!     → upstream response relayed, or error.rs (502 / 503)
//! ```

pub mod error;
pub mod forward;
pub mod request;
pub mod server;

pub use error::GatewayError;
pub use forward::Forwarder;
pub use request::RequestId;
pub use server::HttpServer;
