//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (rounds, timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Backend tokens are not checked here; malformed tokens are skipped at startup

use thiserror::Error;

use crate::config::schema::ProxyConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address must not be empty")]
    EmptyBindAddress,

    /// A numeric field that must be positive was zero.
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("unknown log level {0:?}")]
    UnknownLogLevel(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.trim().is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }

    let positive = [
        ("probe.rounds", u64::from(config.probe.rounds)),
        ("probe.requests_per_round", u64::from(config.probe.requests_per_round)),
        ("probe.timeout_ms", config.probe.timeout_ms),
        ("timeouts.connect_secs", config.timeouts.connect_secs),
        ("timeouts.read_secs", config.timeouts.read_secs),
    ];
    for (field, value) in positive {
        if value == 0 {
            errors.push(ValidationError::Zero(field));
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
