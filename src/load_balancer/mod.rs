//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     backend.rs (parse tokens into descriptors)
//!     → health probing + admission
//!     → Balancer::add(address, weight)
//!
//! Per request:
//!     → Balancer::select() → backend address
//!     → forwarder
//! ```
//!
//! # Design Decisions
//! - Callers only see the narrow `Balancer` interface; the algorithm is swappable
//! - Backend identity is its base address
//! - Empty pool is an explicit `None`, not a sentinel backend

pub mod backend;
pub mod smooth_weighted;

use std::collections::BTreeSet;
use std::fmt::Debug;
use thiserror::Error;

pub use backend::{Backend, ParseError};
pub use smooth_weighted::SmoothWeighted;

/// Errors returned by registry mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The id is already registered.
    #[error("backend {0} is already registered")]
    DuplicateId(String),

    /// Weight must be strictly positive.
    #[error("backend {id} has invalid weight {weight}, must be > 0")]
    InvalidWeight { id: String, weight: i32 },

    /// The id is not registered.
    #[error("backend {0} is not registered")]
    NotFound(String),
}

/// Weighted backend registry.
///
/// Implementations must be safe to call concurrently from request handlers.
pub trait Balancer: Send + Sync + Debug {
    /// Register `id` with the given weight.
    fn add(&self, id: &str, weight: i32) -> Result<(), RegistryError>;

    /// Unregister `id`.
    fn remove(&self, id: &str) -> Result<(), RegistryError>;

    /// Pick the next backend, or `None` if nothing is registered.
    fn select(&self) -> Option<String>;

    /// Snapshot of the registered ids.
    fn ids(&self) -> BTreeSet<String>;
}
