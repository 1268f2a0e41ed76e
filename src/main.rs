//! liveproxy
//!
//! A reverse proxy that probes its backends once at startup, admits the
//! healthy ones into a weighted pool and forwards every request to one of
//! them.
//!
//! # Architecture Overview
//!
//! ```text
//!   backend tokens ──▶ parse ──▶ probe ──▶ admission ──▶ balancer
//!                                                           │
//!   client ──▶ listener ──▶ http server ──▶ select ─────────┘
//!                               │
//!                               ▼
//!                           forwarder ──▶ backend
//! ```

use clap::Parser;
use std::sync::Arc;

use liveproxy::config::Cli;
use liveproxy::health::Prober;
use liveproxy::http::{Forwarder, HttpServer};
use liveproxy::lifecycle::{admit_backends, Shutdown};
use liveproxy::load_balancer::{Balancer, SmoothWeighted};
use liveproxy::net;
use liveproxy::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.observability.log_level);

    tracing::info!("liveproxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backends = config.backends.len(),
        rounds = config.probe.rounds,
        requests_per_round = config.probe.requests_per_round,
        "Configuration loaded"
    );

    let balancer: Arc<dyn Balancer> = Arc::new(SmoothWeighted::new());
    let prober = Prober::from_config(&config.probe)?;

    let admitted = admit_backends(&config.backends, &prober, &config.probe, balancer.as_ref()).await;
    if admitted == 0 {
        tracing::warn!("No backends admitted; requests will be answered with 503");
    }

    let listener = match net::bind(&config.listener.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, "Cannot start listener");
            return Err(e.into());
        }
    };

    let forwarder = Arc::new(Forwarder::from_config(&config.timeouts)?);

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    HttpServer::new(balancer, forwarder)
        .run(listener, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
