//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Backend descriptor
//!     → probe.rs (rounds of concurrent GET trials)
//!     → Quality { failed_rate, avg_latency_ms }
//!     → admission.rs (fixed thresholds)
//!     → admitted into the balancer, or rejected with a reason
//! ```
//!
//! # Design Decisions
//! - Probing happens once, at startup; there is no re-probing afterwards
//! - Trial outcomes are merged at each round's join point, never through shared counters
//! - Thresholds are compile-time constants, not configuration

pub mod admission;
pub mod probe;

pub use admission::{admit, AdmissionRejected};
pub use probe::{Prober, Quality};
