//! Legacy fixed allow-list check.
//!
//! Kept apart from [`KeyService`](crate::KeyService): it never reads the key
//! store and knows nothing about expiry. A presented key either is one of a
//! few literal strings or it is not.

use crate::keys::fingerprint::key_fingerprint;
use crate::protocol::models::LegacyVerifyResponse;
use std::collections::HashSet;
use tracing::debug;

/// Set of literal keys accepted by the legacy verify endpoint.
#[derive(Debug, Clone, Default)]
pub struct LegacyAllowList {
    keys: HashSet<String>,
}

impl LegacyAllowList {
    /// Build an allow-list from literal keys.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `key` is on the list. Matching is exact and case-sensitive.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Whether the list accepts nothing.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Check `key` and build the legacy response body.
    pub fn check(&self, key: Option<&str>) -> LegacyVerifyResponse {
        let accepted = key.is_some_and(|k| self.contains(k));
        if let Some(k) = key {
            debug!(fingerprint = %key_fingerprint(k), accepted, "Legacy allow-list check");
        }

        if accepted {
            LegacyVerifyResponse {
                success: true,
                message: "Key valid".to_string(),
            }
        } else {
            LegacyVerifyResponse {
                success: false,
                message: "Key invalid".to_string(),
            }
        }
    }
}
