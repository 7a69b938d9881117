//! HTTP request handlers.

use super::types::{
    DegreesResponse, HealthResponse, HomeResponse, IssueRequest, IssueResponse, VerifyRequest,
    VerifyResponse,
};
use super::AppState;
use crate::error::{ErrorResponse, RegistryError};
use crate::fingerprint::is_well_formed;
use crate::registry::IssueStatus;
use axum::{extract::State, Json};
use tracing::{debug, info, warn};

/// Welcome endpoint.
#[utoipa::path(
    get,
    path = "/home",
    tag = "degrees",
    responses((status = 200, description = "Welcome message", body = HomeResponse))
)]
pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: "Welcome to Degree Verification API".to_string(),
    })
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "service",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        registry_count: state.registry.count().await,
        fingerprint_scheme: state.registry.scheme().to_string(),
    })
}

/// Issue a degree.
///
/// The fingerprint is always recomputed here; a client-supplied
/// `degree_hash` must agree with it or the request is rejected.
#[utoipa::path(
    post,
    path = "/issue-degree",
    tag = "degrees",
    request_body = IssueRequest,
    responses(
        (status = 200, description = "Degree issued or already on record", body = IssueResponse),
        (status = 400, description = "Missing fields or mismatched degree_hash", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 500, description = "Registry could not be persisted", body = ErrorResponse)
    )
)]
pub async fn issue_degree(
    State(state): State<AppState>,
    Json(request): Json<IssueRequest>,
) -> Result<Json<IssueResponse>, RegistryError> {
    let (fields, supplied) = request
        .into_fields()
        .map_err(|missing| RegistryError::MissingFields(missing.join(", ")))?;

    let computed = state.registry.fingerprint(&fields);
    if let Some(supplied) = supplied {
        if !supplied.eq_ignore_ascii_case(&computed) {
            warn!(%supplied, %computed, "Rejected issuance with mismatched degree_hash");
            return Err(RegistryError::FingerprintMismatch { supplied, computed });
        }
    }

    let outcome = state.registry.issue(fields).await?;

    let message = match outcome.status {
        IssueStatus::Created => "Degree issued successfully!",
        IssueStatus::AlreadyExists => "Degree already issued",
    };

    Ok(Json(IssueResponse {
        message: message.to_string(),
        degree_hash: outcome.fingerprint,
        status: outcome.status,
    }))
}

/// Verify a degree by fingerprint.
#[utoipa::path(
    post,
    path = "/verify-degree",
    tag = "degrees",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Lookup result; a miss has is_valid false", body = VerifyResponse),
        (status = 400, description = "Missing degree_hash", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse)
    )
)]
pub async fn verify_degree(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, RegistryError> {
    let degree_hash = request
        .degree_hash
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .ok_or_else(|| RegistryError::MissingFields("degree_hash".into()))?;

    if !is_well_formed(&degree_hash) {
        debug!(degree_hash = %degree_hash, "Malformed degree_hash, lookup will miss");
    }

    let record = state.registry.verify(&degree_hash).await;
    let is_valid = record.is_some();
    info!(degree_hash = %degree_hash, is_valid, "Verification request");

    Ok(Json(VerifyResponse {
        degree_hash,
        is_valid,
        message: if is_valid {
            "Degree is valid".to_string()
        } else {
            "Degree not found".to_string()
        },
        record,
    }))
}

/// List all issued degrees.
#[utoipa::path(
    get,
    path = "/degrees",
    tag = "degrees",
    responses(
        (status = 200, description = "Every issued record in issuance order", body = DegreesResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse)
    )
)]
pub async fn list_degrees(State(state): State<AppState>) -> Json<DegreesResponse> {
    let degrees = state.registry.list().await;
    let total = degrees.len();
    Json(DegreesResponse { degrees, total })
}
