//! HTTP handlers.

use super::error::ApiError;
use super::AppState;
use crate::protocol::models::{
    ErrorResponse, GenerateKeyResponse, LegacyVerifyResponse, VerifyKeyRequest, VerifyKeyResponse,
};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    "OK"
}

/// POST /api/generate-key
pub async fn generate_key(
    State(state): State<AppState>,
) -> Result<Json<GenerateKeyResponse>, ApiError> {
    let record = state.service.generate_key().map_err(ApiError::Generate)?;
    Ok(Json(GenerateKeyResponse::from(&record)))
}

/// Query string of `GET /api/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    /// The key to check.
    pub key: Option<String>,
}

/// GET /api/verify?key=...
pub async fn verify_query(
    State(state): State<AppState>,
    query: Result<Query<VerifyQuery>, QueryRejection>,
) -> Result<Json<VerifyKeyResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    classify(&state, query.key)
}

/// POST /api/verify with `{"key": "..."}`
pub async fn verify_body(
    State(state): State<AppState>,
    body: Result<Json<VerifyKeyRequest>, JsonRejection>,
) -> Result<Json<VerifyKeyResponse>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    classify(&state, body.key)
}

fn classify(state: &AppState, key: Option<String>) -> Result<Json<VerifyKeyResponse>, ApiError> {
    let key = key.filter(|k| !k.is_empty()).ok_or(ApiError::MissingKey)?;
    let status = state.service.verify_key(&key);
    Ok(Json(VerifyKeyResponse::new(status)))
}

/// POST /api/legacy/verify
///
/// A body that does not parse is treated like a key that is not listed.
pub async fn legacy_verify(
    State(state): State<AppState>,
    body: Result<Json<VerifyKeyRequest>, JsonRejection>,
) -> (StatusCode, Json<LegacyVerifyResponse>) {
    let key = body.ok().and_then(|Json(body)| body.key);
    let response = state.legacy.check(key.as_deref());
    let status = if response.success {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    (status, Json(response))
}

/// Any method other than POST on the legacy endpoint.
pub async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            message: "Method not allowed".to_string(),
        }),
    )
}
