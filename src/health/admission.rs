//! Admission policy.
//!
//! Fixed thresholds decide whether a probed backend joins the live pool.
//! The failure-rate check runs first, so a backend failing both reports
//! `HighFailureRate`.

use thiserror::Error;

use crate::health::probe::Quality;

/// Maximum tolerated fraction of failed trials.
pub const MAX_FAILED_RATE: f64 = 0.5;

/// Maximum tolerated average latency in milliseconds.
pub const MAX_AVG_LATENCY_MS: f64 = 1900.0;

/// Reason a backend was kept out of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AdmissionRejected {
    /// Too many probe trials failed.
    #[error("failure rate {0:.2} exceeds {max}", max = MAX_FAILED_RATE)]
    HighFailureRate(f64),

    /// Probe trials were too slow on average.
    #[error("average latency {0:.1}ms exceeds {max}ms", max = MAX_AVG_LATENCY_MS)]
    HighLatency(f64),
}

/// Decide whether a backend with this score may be admitted.
pub fn admit(quality: &Quality) -> Result<(), AdmissionRejected> {
    // Negated comparisons so NaN is rejected as well.
    if !(quality.failed_rate <= MAX_FAILED_RATE) {
        return Err(AdmissionRejected::HighFailureRate(quality.failed_rate));
    }
    if !(quality.avg_latency_ms <= MAX_AVG_LATENCY_MS) {
        return Err(AdmissionRejected::HighLatency(quality.avg_latency_ms));
    }
    Ok(())
}
