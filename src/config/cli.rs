//! Command-line arguments.
//!
//! Flags override values read from `--config`.

use clap::Parser;
use std::path::PathBuf;

use crate::config::loader::{read_config, ConfigError};
use crate::config::schema::ProxyConfig;
use crate::config::validation::validate_config;

#[derive(Debug, Parser)]
#[command(name = "liveproxy", version)]
#[command(about = "Health-probing weighted reverse proxy", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Listen address, host:port
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Backend as weight:protocol:host[:port]; repeat for more
    #[arg(short, long = "backend", value_name = "TOKEN")]
    pub backends: Vec<String>,

    /// Probe rounds per backend
    #[arg(long)]
    pub rounds: Option<u32>,

    /// Concurrent probe requests per round
    #[arg(long)]
    pub requests_per_round: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Resolve the effective, validated configuration.
    pub fn into_config(self) -> Result<ProxyConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => ProxyConfig::default(),
        };
        self.apply(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    fn apply(self, config: &mut ProxyConfig) {
        if let Some(listen) = self.listen {
            config.listener.bind_address = listen;
        }
        if !self.backends.is_empty() {
            config.backends = self.backends;
        }
        if let Some(rounds) = self.rounds {
            config.probe.rounds = rounds;
        }
        if let Some(n) = self.requests_per_round {
            config.probe.requests_per_round = n;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "liveproxy",
            "--listen",
            "127.0.0.1:7000",
            "-b",
            "1:http:a",
            "--backend",
            "2:https:b:8443",
            "--rounds",
            "1",
        ])
        .unwrap();

        let config = cli.into_config().unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:7000");
        assert_eq!(config.backends, vec!["1:http:a", "2:https:b:8443"]);
        assert_eq!(config.probe.rounds, 1);
        assert_eq!(config.probe.requests_per_round, 5);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let cli = Cli::try_parse_from(["liveproxy", "--requests-per-round", "0"]).unwrap();
        assert!(matches!(cli.into_config(), Err(ConfigError::Validation(_))));
    }
}
