//! Reqwest-based blocking client for a keygate server.
//!
//! This is what a game script links against: ask the server for a key once
//! the verification steps are done, then present it on later launches.

use crate::config::ClientConfig;
use crate::protocol::models::{
    parse_generate_response, parse_verify_response, ErrorResponse, GenerateKeyResponse, KeyStatus,
};
use crate::KeyGateError;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, USER_AGENT};
use std::time::Duration;
use tracing::debug;

/// Blocking keygate HTTP client.
///
/// Must not be created or used from inside an async runtime; wrap calls in
/// `spawn_blocking` there.
pub struct KeyGateClient {
    client: Client,
    base_url: String,
    user_agent: String,
    timeout: Duration,
}

impl KeyGateClient {
    /// Create a new client from config.
    pub fn new(config: &ClientConfig) -> Result<Self, KeyGateError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| KeyGateError::Transport(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: build_user_agent(config),
            timeout: config.timeout,
        })
    }

    /// Set request timeout with fallible construction.
    pub fn try_with_timeout(mut self, timeout: Duration) -> Result<Self, KeyGateError> {
        self.timeout = timeout;
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| KeyGateError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    /// Request a freshly issued key.
    pub fn generate_key(&self) -> Result<GenerateKeyResponse, KeyGateError> {
        let url = format!("{}/api/generate-key", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| KeyGateError::Transport(format!("Request failed: {}", e)))?;

        let body = read_success_body(response)?;
        parse_generate_response(&body)
    }

    /// Ask the server to classify `key`.
    ///
    /// # Errors
    /// - `MissingKey` - `key` is empty; no request is sent
    /// - `Transport` - the server could not be reached
    /// - `Server` - the server rejected the request
    pub fn verify_key(&self, key: &str) -> Result<KeyStatus, KeyGateError> {
        if key.is_empty() {
            return Err(KeyGateError::MissingKey);
        }

        let url = format!("{}/api/verify", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("key", key)])
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| KeyGateError::Transport(format!("Request failed: {}", e)))?;

        let body = read_success_body(response)?;
        let status = parse_verify_response(&body)?.status;
        debug!(%status, "Server classified key");
        Ok(status)
    }

    /// Get the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Read the body of a 2xx response, or turn anything else into `Server`.
fn read_success_body(response: Response) -> Result<Vec<u8>, KeyGateError> {
    let status = response.status();
    let body = response
        .bytes()
        .map_err(|e| KeyGateError::Transport(format!("Failed to read body: {}", e)))?
        .to_vec();

    if status.is_success() {
        return Ok(body);
    }

    let message = serde_json::from_slice::<ErrorResponse>(&body)
        .map(|e| e.message)
        .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
    Err(KeyGateError::Server {
        status: status.as_u16(),
        message,
    })
}

/// Build a User-Agent string from config.
///
/// Format: `<product>/keygate-<version>`
/// Example: `my-game/keygate-0.1.0`
pub fn build_user_agent(config: &ClientConfig) -> String {
    format!(
        "{}/keygate-{}",
        config.user_agent_product,
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ClientConfig {
        ClientConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            user_agent_product: "my-game".to_string(),
            timeout: Duration::from_millis(500),
        }
    }

    #[test]
    fn test_build_user_agent_format() {
        let ua = build_user_agent(&test_config());
        assert_eq!(ua, format!("my-game/keygate-{}", env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_client_creation_trims_trailing_slash() {
        let client = KeyGateClient::new(&test_config()).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9");
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let config = ClientConfig {
            base_url: "ftp://example.com".to_string(),
            ..test_config()
        };
        assert!(matches!(
            KeyGateClient::new(&config),
            Err(KeyGateError::ConfigError(_))
        ));
    }

    #[test]
    fn test_try_with_timeout() {
        let client = KeyGateClient::new(&test_config())
            .unwrap()
            .try_with_timeout(Duration::from_secs(5))
            .unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_verify_empty_key_sends_nothing() {
        let client = KeyGateClient::new(&test_config()).unwrap();
        assert!(matches!(client.verify_key(""), Err(KeyGateError::MissingKey)));
    }

    #[test]
    fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) is not expected to have an HTTP listener.
        let client = KeyGateClient::new(&test_config()).unwrap();
        assert!(matches!(
            client.verify_key("ABCD1234EFGH5678"),
            Err(KeyGateError::Transport(_))
        ));
    }
}
