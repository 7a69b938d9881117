//! Registry API types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Fingerprint a degree the way browser clients do: SHA-256 over
/// `name-id-degree-year`, rendered `0x` + lowercase hex.
///
/// The server recomputes this and rejects a value that disagrees.
pub fn legacy_fingerprint(name: &str, id: &str, degree: &str, year: &str) -> String {
    let digest = Sha256::digest(format!("{}-{}-{}-{}", name, id, degree, year).as_bytes());
    format!("0x{}", hex::encode(digest))
}

/// Request to issue a degree.
#[derive(Debug, Clone, Serialize)]
pub struct IssueRequest {
    pub student_name: String,
    pub student_id: String,
    pub degree_name: String,
    pub year_of_passing: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree_hash: Option<String>,
}

impl IssueRequest {
    /// Build a request carrying a locally computed `degree_hash`.
    pub fn new(
        student_name: impl Into<String>,
        student_id: impl Into<String>,
        degree_name: impl Into<String>,
        year_of_passing: impl ToString,
    ) -> Self {
        let mut request = Self::without_hash(student_name, student_id, degree_name, year_of_passing);
        request.degree_hash = Some(legacy_fingerprint(
            &request.student_name,
            &request.student_id,
            &request.degree_name,
            &request.year_of_passing,
        ));
        request
    }

    /// Build a request and leave fingerprinting entirely to the server.
    pub fn without_hash(
        student_name: impl Into<String>,
        student_id: impl Into<String>,
        degree_name: impl Into<String>,
        year_of_passing: impl ToString,
    ) -> Self {
        Self {
            student_name: student_name.into(),
            student_id: student_id.into(),
            degree_name: degree_name.into(),
            year_of_passing: year_of_passing.to_string(),
            degree_hash: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Created,
    AlreadyExists,
}

/// Response after issuing a degree.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueResponse {
    pub message: String,
    pub degree_hash: String,
    pub status: IssueStatus,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct VerifyRequest<'a> {
    pub degree_hash: &'a str,
}

/// An issued degree record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DegreeRecord {
    pub student_name: String,
    pub student_id: String,
    pub degree_name: String,
    pub year_of_passing: String,
    pub fingerprint: String,
    pub issued_at: DateTime<Utc>,
}

/// Verification result.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    pub degree_hash: String,
    pub is_valid: bool,
    pub message: String,
    #[serde(default)]
    pub record: Option<DegreeRecord>,
}

/// All issued degrees.
#[derive(Debug, Clone, Deserialize)]
pub struct DegreesResponse {
    pub degrees: Vec<DegreeRecord>,
    pub total: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub registry_count: usize,
    pub fingerprint_scheme: String,
}

/// Error body returned by the registry.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
    pub code: String,
}
