//! Per-request identity.
//!
//! The id tags log events only; it is not added to forwarded headers so the
//! upstream sees the client's request unchanged.

use std::fmt;
use uuid::Uuid;

/// Unique identifier for one proxied request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generate a new random (v4) request id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
        assert_eq!(RequestId::new().to_string().len(), 36);
    }
}
