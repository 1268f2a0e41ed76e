//! Observability subsystem.
//!
//! Startup probing and per-request forwarding emit `tracing` events with
//! structured fields; `logging.rs` installs the subscriber.

pub mod logging;
