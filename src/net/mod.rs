//! Network layer subsystem.
//!
//! # Design Decisions
//! - A bind failure is the only fatal runtime error
//! - Connection handling is left to axum/hyper

pub mod listener;

pub use listener::{bind, ListenerError};
