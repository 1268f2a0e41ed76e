//! Startup orchestration.
//!
//! # Responsibilities
//! - Parse backend tokens, skipping malformed ones
//! - Probe each backend and apply the admission policy
//! - Register admitted backends with the balancer
//!
//! # Design Decisions
//! - Backends are probed one at a time, in the order given
//! - Every rejection is logged with its reason and processing continues

use crate::config::ProbeConfig;
use crate::health::{admit, Prober};
use crate::load_balancer::{backend::parse_many, Balancer};

/// Probe `tokens` and register the healthy backends in `balancer`.
///
/// Returns the number of backends admitted.
pub async fn admit_backends<S: AsRef<str>>(
    tokens: &[S],
    prober: &Prober,
    probe: &ProbeConfig,
    balancer: &dyn Balancer,
) -> usize {
    let backends = parse_many(tokens, |token, err| {
        tracing::warn!(token, error = %err, "{}: invalid backend", token);
    });

    let mut admitted = 0;
    for backend in backends {
        let quality = prober
            .probe(&backend, probe.rounds, probe.requests_per_round)
            .await;

        if let Err(reason) = admit(&quality) {
            tracing::warn!(
                "{} ... quality={} => bad upstream ({})",
                backend,
                quality,
                reason
            );
            continue;
        }

        match balancer.add(&backend.address(), backend.weight) {
            Ok(()) => {
                tracing::info!(
                    weight = backend.weight,
                    "{} ... quality={} => OK",
                    backend,
                    quality
                );
                admitted += 1;
            }
            Err(e) => {
                tracing::warn!(error = %e, "{}: cannot add to load balancer", backend);
            }
        }
    }

    tracing::info!(
        admitted,
        backends = ?balancer.ids(),
        "Backend admission complete"
    );
    admitted
}
