//! In-memory key store.
//!
//! Records live in a `HashMap` keyed by value behind one
//! [`parking_lot::RwLock`]. Every operation holds the lock for its whole
//! duration, so readers never observe a half-written record.
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | create / try_create | O(1) |
//! | get_by_value | O(1) |
//! | sweep_expired | O(n) |
//!
//! Data is not persisted; everything is lost when the process exits.

use crate::config::KeyGateConfig;
use crate::keys::fingerprint::key_fingerprint;
use crate::protocol::models::KeyRecord;
use crate::KeyGateError;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

/// Shared in-memory store of [`KeyRecord`]s.
///
/// Cheaply cloneable; all clones share the same map.
#[derive(Clone, Default)]
pub struct KeyStore {
    records: Arc<RwLock<HashMap<String, KeyRecord>>>,
    max_records: Option<usize>,
}

impl KeyStore {
    /// Create an unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that refuses new values once it holds `max_records`.
    pub fn with_capacity_limit(max_records: usize) -> Self {
        Self {
            records: Arc::default(),
            max_records: Some(max_records),
        }
    }

    /// Create a store bounded by `config.max_records`, or unbounded if unset.
    pub fn from_config(config: &KeyGateConfig) -> Self {
        Self {
            records: Arc::default(),
            max_records: config.max_records,
        }
    }

    /// The capacity limit, if any.
    pub fn max_records(&self) -> Option<usize> {
        self.max_records
    }

    /// Insert a record for `value`, replacing any record already stored
    /// under the same value.
    ///
    /// # Errors
    /// - `InvalidExpiry` if `expires_at <= created_at`
    /// - `StoreFull` if the store is at capacity and `value` is new
    pub fn create(
        &self,
        value: &str,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<KeyRecord, KeyGateError> {
        let record = build_record(value, created_at, expires_at)?;

        let mut records = self.records.write();
        if !records.contains_key(value) {
            self.check_capacity(records.len())?;
        }
        if let Some(previous) = records.insert(value.to_string(), record.clone()) {
            debug!(
                fingerprint = %key_fingerprint(value),
                replaced_id = %previous.id,
                "Overwrote existing key record"
            );
        }
        Ok(record)
    }

    /// Insert a record for `value` unless one already exists.
    ///
    /// The presence check and the insert happen under one write lock.
    ///
    /// # Errors
    /// - `DuplicateKey` if `value` is already stored
    /// - `InvalidExpiry` if `expires_at <= created_at`
    /// - `StoreFull` if the store is at capacity
    pub fn try_create(
        &self,
        value: &str,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<KeyRecord, KeyGateError> {
        let record = build_record(value, created_at, expires_at)?;

        let mut records = self.records.write();
        if records.contains_key(value) {
            return Err(KeyGateError::DuplicateKey);
        }
        self.check_capacity(records.len())?;
        records.insert(value.to_string(), record.clone());
        Ok(record)
    }

    /// Look up the record for `value`, whether or not it has expired.
    pub fn get_by_value(&self, value: &str) -> Option<KeyRecord> {
        self.records.read().get(value).cloned()
    }

    /// Remove every record with `expires_at < now`. Returns how many were removed.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|_, record| record.expires_at >= now);
        before - records.len()
    }

    /// Number of stored records, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_capacity(&self, current: usize) -> Result<(), KeyGateError> {
        match self.max_records {
            Some(limit) if current >= limit => {
                error!(limit, "Key store is full");
                Err(KeyGateError::StoreFull { limit })
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Values are bearer tokens; only the shape of the store is printed.
        f.debug_struct("KeyStore")
            .field("len", &self.len())
            .field("max_records", &self.max_records)
            .finish()
    }
}

fn build_record(
    value: &str,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> Result<KeyRecord, KeyGateError> {
    if expires_at <= created_at {
        return Err(KeyGateError::InvalidExpiry);
    }
    Ok(KeyRecord {
        id: Uuid::new_v4(),
        value: value.to_string(),
        created_at,
        expires_at,
    })
}
