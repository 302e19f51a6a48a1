//! Key records and the JSON bodies exchanged over HTTP.

use crate::KeyGateError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored access key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRecord {
    /// Unique record identifier, never reused.
    pub id: Uuid,

    /// The public token string handed to the caller.
    pub value: String,

    /// When the key was issued.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    /// First instant at which the key is no longer valid.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
}

impl KeyRecord {
    /// Whether the key has expired as of `now`.
    ///
    /// `expires_at` is exclusive: a key is valid strictly before it. This is
    /// stricter than [`KeyStore::sweep_expired`](crate::store::KeyStore::sweep_expired),
    /// which keeps a record at exactly `expires_at` until the next sweep.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Three-way classification of a presented key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStatus {
    /// Known and not yet expired.
    Valid,
    /// Known but past its expiry.
    Expired,
    /// Never issued, or already swept.
    Invalid,
}

impl KeyStatus {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Expired => "expired",
            Self::Invalid => "invalid",
        }
    }
}

impl std::fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body returned by the generate endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateKeyResponse {
    /// The issued key value.
    pub key: String,
    /// Expiry, milliseconds since the Unix epoch.
    pub expires_at: i64,
    /// Issue time, milliseconds since the Unix epoch.
    pub created_at: i64,
}

impl From<&KeyRecord> for GenerateKeyResponse {
    fn from(record: &KeyRecord) -> Self {
        Self {
            key: record.value.clone(),
            expires_at: record.expires_at.timestamp_millis(),
            created_at: record.created_at.timestamp_millis(),
        }
    }
}

/// Body accepted by `POST /api/verify`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyKeyRequest {
    /// The key to check. Optional so a missing field is a request-format
    /// error rather than a deserialization failure.
    #[serde(default)]
    pub key: Option<String>,
}

/// Body returned by the verify endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyKeyResponse {
    /// Classification of the key.
    pub status: KeyStatus,
    /// Optional human-readable detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl VerifyKeyResponse {
    /// Response carrying only a status.
    pub fn new(status: KeyStatus) -> Self {
        Self {
            status,
            message: None,
        }
    }
}

/// Body returned by the legacy allow-list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyVerifyResponse {
    /// Whether the key is on the allow-list.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
}

/// Error body for request-format and internal failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason.
    pub message: String,
}

/// Parse a generate response body.
pub fn parse_generate_response(body: &[u8]) -> Result<GenerateKeyResponse, KeyGateError> {
    serde_json::from_slice(body)
        .map_err(|e| KeyGateError::Protocol(format!("Failed to parse generate response: {}", e)))
}

/// Parse a verify response body.
pub fn parse_verify_response(body: &[u8]) -> Result<VerifyKeyResponse, KeyGateError> {
    serde_json::from_slice(body)
        .map_err(|e| KeyGateError::Protocol(format!("Failed to parse verify response: {}", e)))
}
