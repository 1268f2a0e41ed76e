//! Active health probing.
//!
//! # Responsibilities
//! - Run sequential rounds of concurrent GET trials against a backend
//! - Reduce trial outcomes into a `Quality` score
//!
//! Any HTTP response counts as a success regardless of status; only
//! timeouts and transport errors are failures.

use futures_util::future::join_all;
use reqwest::Client;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time;

use crate::config::ProbeConfig;
use crate::load_balancer::Backend;

/// Probe result for one backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quality {
    /// Fraction of trials that failed.
    pub failed_rate: f64,
    /// Sum of successful latencies divided by *all* attempts, in ms.
    pub avg_latency_ms: f64,
}

impl Quality {
    /// Score for a backend that could not be probed at all.
    pub fn unreachable() -> Self {
        Self {
            failed_rate: f64::INFINITY,
            avg_latency_ms: f64::INFINITY,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(fails={:.2}, avg={:.1}ms)",
            self.failed_rate, self.avg_latency_ms
        )
    }
}

#[derive(Debug, Default)]
struct Tally {
    attempts: u64,
    failures: u64,
    latency_sum_ms: f64,
}

impl Tally {
    fn record(&mut self, outcome: Option<Duration>) {
        self.attempts += 1;
        match outcome {
            Some(elapsed) => self.latency_sum_ms += elapsed.as_secs_f64() * 1000.0,
            None => self.failures += 1,
        }
    }

    fn quality(&self) -> Quality {
        if self.attempts == 0 {
            return Quality::unreachable();
        }
        let attempts = self.attempts as f64;
        Quality {
            failed_rate: self.failures as f64 / attempts,
            // Divided by attempts, not successes: failures drag the average down too.
            avg_latency_ms: self.latency_sum_ms / attempts,
        }
    }
}

/// Issues trial requests and scores backends.
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    timeout: Duration,
}

impl Prober {
    /// Create a prober around an existing client.
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Build a prober with its own client from configuration.
    pub fn from_config(config: &ProbeConfig) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = Client::builder()
            .connect_timeout(timeout)
            .no_proxy()
            .user_agent(concat!("liveproxy-probe/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::new(client, timeout))
    }

    /// Probe `backend` for `rounds` rounds of `requests_per_round` concurrent trials.
    ///
    /// Rounds run strictly one after another; a round completes only once all
    /// of its trials have finished or timed out.
    pub async fn probe(&self, backend: &Backend, rounds: u32, requests_per_round: u32) -> Quality {
        let url = backend.address();
        let mut tally = Tally::default();

        for round in 0..rounds {
            let trials = (0..requests_per_round).map(|_| self.trial(&url));
            let outcomes = join_all(trials).await;

            let failed = outcomes.iter().filter(|o| o.is_none()).count();
            tracing::debug!(
                backend = %backend,
                round = round + 1,
                failed,
                "Probe round complete"
            );

            for outcome in outcomes {
                tally.record(outcome);
            }
        }

        tally.quality()
    }

    /// One GET; returns the round-trip time on success.
    async fn trial(&self, url: &str) -> Option<Duration> {
        let start = Instant::now();
        match time::timeout(self.timeout, self.client.get(url).send()).await {
            Ok(Ok(_response)) => Some(start.elapsed()),
            Ok(Err(e)) => {
                tracing::trace!(url, error = %e, "Probe trial failed");
                None
            }
            Err(_) => {
                tracing::trace!(url, "Probe trial timed out");
                None
            }
        }
    }
}
