//! Command-line and environment configuration for the `keygate` binary.

use crate::config::{KeyGateConfig, DEFAULT_COLLISION_RETRIES, DEFAULT_KEY_LENGTH};
use crate::KeyGateError;
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

/// Keygate - short-lived access key server
#[derive(Parser, Debug, Clone)]
#[command(name = "keygate")]
#[command(about = "Issues and verifies short-lived access keys")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Key lifetime in seconds
    #[arg(long, env = "KEY_TTL_SECS", default_value = "86400")]
    pub key_ttl_secs: u64,

    /// Seconds between expired-key sweeps
    #[arg(long, env = "SWEEP_INTERVAL_SECS", default_value = "60")]
    pub sweep_interval_secs: u64,

    /// Length of generated key values
    #[arg(long, env = "KEY_LENGTH", default_value_t = DEFAULT_KEY_LENGTH)]
    pub key_length: usize,

    /// Maximum number of stored keys (unbounded if unset)
    #[arg(long, env = "MAX_RECORDS")]
    pub max_records: Option<usize>,

    /// Extra attempts when a generated key collides with a stored one
    #[arg(long, env = "COLLISION_RETRIES", default_value_t = DEFAULT_COLLISION_RETRIES)]
    pub collision_retries: u32,

    /// Comma-separated keys for the legacy allow-list endpoint (empty disables it)
    #[arg(
        long,
        env = "LEGACY_KEYS",
        value_delimiter = ',',
        default_value = "ABC123,DEF456,GHI789"
    )]
    pub legacy_keys: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Build and validate the library configuration.
    pub fn to_config(&self) -> Result<KeyGateConfig, KeyGateError> {
        let config = KeyGateConfig {
            key_length: self.key_length,
            key_ttl: Duration::from_secs(self.key_ttl_secs),
            sweep_interval: Duration::from_secs(self.sweep_interval_secs),
            max_records: self.max_records,
            collision_retries: self.collision_retries,
            legacy_keys: self
                .legacy_keys
                .iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("keygate").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_library_defaults() {
        let config = parse(&[]).to_config().unwrap();
        let defaults = KeyGateConfig::default();

        assert_eq!(config.key_length, defaults.key_length);
        assert_eq!(config.key_ttl, defaults.key_ttl);
        assert_eq!(config.sweep_interval, defaults.sweep_interval);
        assert_eq!(config.max_records, None);
        assert_eq!(config.collision_retries, defaults.collision_retries);
        assert_eq!(config.legacy_keys, defaults.legacy_keys);
    }

    #[test]
    fn overrides_are_applied() {
        let args = parse(&[
            "--listen",
            "127.0.0.1:3000",
            "--key-ttl-secs",
            "3600",
            "--sweep-interval-secs",
            "5",
            "--max-records",
            "100",
            "--legacy-keys",
            "ONE, TWO",
        ]);
        assert_eq!(args.listen, "127.0.0.1:3000".parse().unwrap());

        let config = args.to_config().unwrap();
        assert_eq!(config.key_ttl, Duration::from_secs(3600));
        assert_eq!(config.sweep_interval, Duration::from_secs(5));
        assert_eq!(config.max_records, Some(100));
        assert_eq!(config.legacy_keys, vec!["ONE", "TWO"]);
    }

    #[test]
    fn empty_legacy_list_disables_endpoint() {
        let config = parse(&["--legacy-keys", ""]).to_config().unwrap();
        assert!(config.legacy_keys.is_empty());
    }

    #[test]
    fn invalid_values_fail_validation() {
        assert!(parse(&["--key-ttl-secs", "0"]).to_config().is_err());
        assert!(parse(&["--sweep-interval-secs", "0"]).to_config().is_err());
        assert!(parse(&["--key-length", "0"]).to_config().is_err());
    }
}
