//! API request and response types.

use crate::registry::{DegreeFields, DegreeRecord, IssueStatus, TextOrInteger};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Request to issue a degree.
///
/// All fields are optional at the wire level so that missing ones can be
/// reported together.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct IssueRequest {
    #[schema(example = "Alice Smith")]
    pub student_name: Option<String>,
    #[schema(example = "S123")]
    pub student_id: Option<String>,
    #[schema(example = "BSc Computer Science")]
    pub degree_name: Option<String>,

    /// Accepted as a JSON string or integer
    #[serde(default, deserialize_with = "optional_text_or_integer")]
    #[schema(value_type = Option<String>, example = "2023")]
    pub year_of_passing: Option<String>,

    /// Client-computed fingerprint; rejected if it disagrees with the server's
    pub degree_hash: Option<String>,
}

impl IssueRequest {
    /// Split into the record fields, or report which ones are missing.
    pub fn into_fields(self) -> Result<(DegreeFields, Option<String>), Vec<&'static str>> {
        let fields = DegreeFields::new(
            self.student_name.unwrap_or_default(),
            self.student_id.unwrap_or_default(),
            self.degree_name.unwrap_or_default(),
            self.year_of_passing.unwrap_or_default(),
        );

        let missing = fields.missing_fields();
        if !missing.is_empty() {
            return Err(missing);
        }

        let supplied = self
            .degree_hash
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty());

        Ok((fields, supplied))
    }
}

/// Response after issuing a degree.
#[derive(Debug, Serialize, ToSchema)]
pub struct IssueResponse {
    pub message: String,
    pub degree_hash: String,
    pub status: IssueStatus,
}

/// Request to verify a degree by fingerprint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyRequest {
    #[schema(example = "0xace7bebc94fffc3a5e16c1d7af964fbde87d740c646aed112bb248aba324b526")]
    pub degree_hash: Option<String>,
}

/// Verification result. A miss is reported with `is_valid: false`.
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResponse {
    pub degree_hash: String,
    pub is_valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<DegreeRecord>,
}

/// List of issued degrees.
#[derive(Debug, Serialize, ToSchema)]
pub struct DegreesResponse {
    pub degrees: Vec<DegreeRecord>,
    pub total: usize,
}

/// Welcome message.
#[derive(Debug, Serialize, ToSchema)]
pub struct HomeResponse {
    pub message: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub registry_count: usize,
    pub fingerprint_scheme: String,
}

fn optional_text_or_integer<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TextOrInteger>::deserialize(deserializer)?.map(String::from))
}
