//! HTTP error mapping.

use crate::protocol::models::ErrorResponse;
use crate::KeyGateError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

/// Failures surfaced by the HTTP handlers.
///
/// Request-format problems become 400 and storage faults become 500. None of
/// them is ever reported as an `invalid` key classification.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The `key` parameter is missing or empty.
    #[error("Key parameter is required")]
    MissingKey,

    /// The request could not be parsed.
    #[error("Malformed request: {0}")]
    BadRequest(String),

    /// Issuing a key failed inside the service.
    #[error("Failed to generate key")]
    Generate(#[source] KeyGateError),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingKey | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Generate(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Generate(source) => error!("Error generating key: {}", source),
            Self::BadRequest(detail) => warn!("Rejected malformed request: {}", detail),
            Self::MissingKey => {}
        }

        let body = ErrorResponse {
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_format_errors_are_400() {
        assert_eq!(ApiError::MissingKey.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::BadRequest("bad json".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn storage_faults_are_500_without_leaking_detail() {
        let err = ApiError::Generate(KeyGateError::StoreFull { limit: 10 });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to generate key");
    }
}
