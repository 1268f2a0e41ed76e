//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Parse backend tokens → Probe each → Admit → Register in balancer
//!     → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → broadcast → server stops accepting and drains
//! ```
//!
//! # Design Decisions
//! - Backends are probed before the listener binds (traffic only when ready)
//! - A bad backend never aborts startup; only a bind failure does

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::admit_backends;
