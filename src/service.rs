//! Key Service - the main public API for keygate.
//!
//! The `KeyService` issues keys and classifies presented keys:
//! - Generation of random, time-bounded key values
//! - Retry on the rare value collision
//! - Three-way verification against the store

use crate::clock::{truncate_to_millis, Clock, SystemClock};
use crate::config::KeyGateConfig;
use crate::keys::fingerprint::key_fingerprint;
use crate::keys::generator::{KeyGenerator, RandomKeyGenerator};
use crate::protocol::models::{KeyRecord, KeyStatus};
use crate::store::KeyStore;
use crate::KeyGateError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Issues and verifies access keys.
///
/// Holds no state of its own beyond the injected store, clock and random
/// source, so it is cheap to clone and share between request handlers.
#[derive(Clone)]
pub struct KeyService {
    store: KeyStore,
    clock: Arc<dyn Clock>,
    generator: Arc<dyn KeyGenerator>,
    key_length: usize,
    key_ttl: chrono::Duration,
    collision_retries: u32,
}

impl KeyService {
    /// Create a key service over `store` using wall-clock time and the
    /// thread-local CSPRNG.
    ///
    /// The service does not own capacity: build the store with
    /// [`KeyStore::from_config`] to apply `config.max_records`.
    ///
    /// # Errors
    /// Returns `ConfigError` if the configuration fails validation, or if
    /// `config.max_records` is set and `store` has a different limit.
    pub fn new(store: KeyStore, config: &KeyGateConfig) -> Result<Self, KeyGateError> {
        Self::from_parts(
            store,
            config,
            Arc::new(SystemClock),
            Arc::new(RandomKeyGenerator),
        )
    }

    /// Create a key service with an explicit clock and random source.
    ///
    /// # Errors
    /// Same as [`KeyService::new`].
    pub fn from_parts(
        store: KeyStore,
        config: &KeyGateConfig,
        clock: Arc<dyn Clock>,
        generator: Arc<dyn KeyGenerator>,
    ) -> Result<Self, KeyGateError> {
        config.validate()?;
        let key_ttl = config
            .ttl_chrono()
            .ok_or_else(|| KeyGateError::ConfigError("key_ttl is out of range".to_string()))?;

        if config.max_records.is_some() && store.max_records() != config.max_records {
            return Err(KeyGateError::ConfigError(format!(
                "max_records is {:?} but the store limit is {:?}",
                config.max_records,
                store.max_records()
            )));
        }

        Ok(Self {
            store,
            clock,
            generator,
            key_length: config.key_length,
            key_ttl,
            collision_retries: config.collision_retries,
        })
    }

    /// Issue a new key stamped with the injected clock's current time.
    pub fn generate_key(&self) -> Result<KeyRecord, KeyGateError> {
        self.generate_key_at(self.clock.now_utc())
    }

    /// Issue a new key created at `now` and expiring one TTL later.
    ///
    /// # Errors
    /// - `KeyCollision` - every drawn value was already stored
    /// - `StoreFull` / `InvalidExpiry` - storage fault, propagated as is
    pub fn generate_key_at(&self, now: DateTime<Utc>) -> Result<KeyRecord, KeyGateError> {
        let created_at = truncate_to_millis(now);
        let expires_at = created_at
            .checked_add_signed(self.key_ttl)
            .ok_or(KeyGateError::InvalidExpiry)?;

        let attempts = self.collision_retries.saturating_add(1);
        for attempt in 1..=attempts {
            let value = self.generator.generate(self.key_length);

            match self.store.try_create(&value, created_at, expires_at) {
                Ok(record) => {
                    debug!(
                        fingerprint = %key_fingerprint(&record.value),
                        expires_at = record.expires_at.timestamp_millis(),
                        "Issued key"
                    );
                    return Ok(record);
                }
                Err(KeyGateError::DuplicateKey) => {
                    warn!(attempt, "Generated key value collided with a stored key");
                }
                Err(e) => {
                    error!("Failed to store generated key: {}", e);
                    return Err(e);
                }
            }
        }

        error!(attempts, "Gave up generating a unique key");
        Err(KeyGateError::KeyCollision { attempts })
    }

    /// Classify `value` as of the injected clock's current time.
    pub fn verify_key(&self, value: &str) -> KeyStatus {
        self.verify_key_at(value, self.clock.now_utc())
    }

    /// Classify `value` as of `now`.
    ///
    /// Keys are not consumed: a valid key stays valid for every call until
    /// it expires.
    pub fn verify_key_at(&self, value: &str, now: DateTime<Utc>) -> KeyStatus {
        let status = match self.store.get_by_value(value) {
            None => KeyStatus::Invalid,
            Some(record) if record.is_expired_at(now) => KeyStatus::Expired,
            Some(_) => KeyStatus::Valid,
        };
        debug!(fingerprint = %key_fingerprint(value), %status, "Verified key");
        status
    }

    /// The backing store.
    pub fn store(&self) -> &KeyStore {
        &self.store
    }

    /// The clock used for `generate_key` and `verify_key`.
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }
}

impl std::fmt::Debug for KeyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyService")
            .field("store", &self.store)
            .field("key_length", &self.key_length)
            .field("key_ttl", &self.key_ttl)
            .field("collision_retries", &self.collision_retries)
            .finish_non_exhaustive()
    }
}
