//! Error types for the degree registry.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Registry error types.
///
/// A verification miss and a duplicate issuance are ordinary outcomes,
/// not errors, and have no variant here.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Missing fields: {0}")]
    MissingFields(String),

    #[error("Supplied degree_hash {supplied} does not match computed fingerprint {computed}")]
    FingerprintMismatch { supplied: String, computed: String },

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RegistryError {
    /// Stable machine-readable code for the response body.
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::MissingFields(_) => "MISSING_FIELDS",
            RegistryError::FingerprintMismatch { .. } => "FINGERPRINT_MISMATCH",
            RegistryError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            RegistryError::Storage(_) => "STORAGE_ERROR",
            RegistryError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RegistryError::MissingFields(_) | RegistryError::FingerprintMismatch { .. } => {
                StatusCode::BAD_REQUEST
            }
            RegistryError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            RegistryError::Storage(_) | RegistryError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error code attached to error responses for request logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode(pub &'static str);

/// Error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        };

        let mut response = (self.status(), Json(body)).into_response();
        response.extensions_mut().insert(ErrorCode(self.code()));
        response
    }
}

impl From<std::io::Error> for RegistryError {
    fn from(e: std::io::Error) -> Self {
        RegistryError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(e: serde_json::Error) -> Self {
        RegistryError::Storage(format!("JSON serialization error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            RegistryError::MissingFields("student_id".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RegistryError::RateLimitExceeded.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            RegistryError::Storage("disk full".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_response_carries_error_code() {
        let response = RegistryError::FingerprintMismatch {
            supplied: "0xaa".into(),
            computed: "0xbb".into(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.extensions().get::<ErrorCode>(),
            Some(&ErrorCode("FINGERPRINT_MISMATCH"))
        );
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let err: RegistryError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert!(matches!(err, RegistryError::Storage(ref msg) if msg == "boom"));
        assert_eq!(err.code(), "STORAGE_ERROR");
    }
}
