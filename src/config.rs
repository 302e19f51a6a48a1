//! Keygate configuration.

use crate::KeyGateError;
use std::time::Duration;

/// Default length of a generated key value.
pub const DEFAULT_KEY_LENGTH: usize = 16;

/// Default key lifetime (24 hours).
pub const DEFAULT_KEY_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default interval between expiry sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Default number of extra draws when a generated value is already taken.
pub const DEFAULT_COLLISION_RETRIES: u32 = 5;

/// Keys accepted by the legacy allow-list endpoint unless overridden.
pub const DEFAULT_LEGACY_KEYS: &[&str] = &["ABC123", "DEF456", "GHI789"];

/// Configuration for key issuance and storage.
#[derive(Debug, Clone)]
pub struct KeyGateConfig {
    /// Number of characters in a generated key value.
    pub key_length: usize,

    /// How long a key stays valid after it is issued.
    pub key_ttl: Duration,

    /// How often the background sweep evicts expired records.
    /// Only affects memory footprint; verification re-checks expiry itself.
    pub sweep_interval: Duration,

    /// Upper bound on stored records. `None` means unbounded.
    /// Applied by [`KeyStore::from_config`](crate::store::KeyStore::from_config).
    pub max_records: Option<usize>,

    /// Extra generation attempts after a value collision.
    pub collision_retries: u32,

    /// Literal keys accepted by the legacy allow-list endpoint.
    /// An empty list disables that endpoint.
    pub legacy_keys: Vec<String>,
}

impl Default for KeyGateConfig {
    fn default() -> Self {
        Self {
            key_length: DEFAULT_KEY_LENGTH,
            key_ttl: DEFAULT_KEY_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            max_records: None,
            collision_retries: DEFAULT_COLLISION_RETRIES,
            legacy_keys: DEFAULT_LEGACY_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl KeyGateConfig {
    /// Validate configuration for obvious errors.
    pub fn validate(&self) -> Result<(), KeyGateError> {
        if self.key_length == 0 {
            return Err(KeyGateError::ConfigError(
                "key_length must be at least 1".to_string(),
            ));
        }
        if self.key_ttl.as_millis() == 0 {
            return Err(KeyGateError::ConfigError(
                "key_ttl must be at least one millisecond".to_string(),
            ));
        }
        if self.ttl_chrono().is_none() {
            return Err(KeyGateError::ConfigError(format!(
                "key_ttl of {}s is out of range",
                self.key_ttl.as_secs()
            )));
        }
        if self.sweep_interval.is_zero() {
            return Err(KeyGateError::ConfigError(
                "sweep_interval cannot be zero".to_string(),
            ));
        }
        if self.max_records == Some(0) {
            return Err(KeyGateError::ConfigError(
                "max_records must be positive when set".to_string(),
            ));
        }
        if self.legacy_keys.iter().any(|k| k.is_empty()) {
            return Err(KeyGateError::ConfigError(
                "legacy_keys cannot contain an empty key".to_string(),
            ));
        }
        Ok(())
    }

    /// Key lifetime as a chrono duration, truncated to whole milliseconds.
    pub fn ttl_chrono(&self) -> Option<chrono::Duration> {
        let ms = i64::try_from(self.key_ttl.as_millis()).ok()?;
        chrono::Duration::try_milliseconds(ms)
    }
}

/// Configuration for [`KeyGateClient`](crate::client::http::KeyGateClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the keygate server, e.g. `http://127.0.0.1:8080`.
    pub base_url: String,

    /// User-Agent product identifier (e.g., "my-game").
    pub user_agent_product: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Client config for `base_url` with default product name and timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent_product: "keygate-client".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Validate configuration for obvious errors.
    pub fn validate(&self) -> Result<(), KeyGateError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(KeyGateError::ConfigError(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.user_agent_product.is_empty() {
            return Err(KeyGateError::ConfigError(
                "user_agent_product cannot be empty".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(KeyGateError::ConfigError(
                "timeout cannot be zero".to_string(),
            ));
        }
        Ok(())
    }
}
