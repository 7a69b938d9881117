//! Degree registry keyed by content fingerprint.

mod memory;
mod service;
mod store;

pub use memory::Registry;
pub use service::RegistryService;
pub use store::{FileStore, MemoryStore, Store};

use crate::fingerprint::FingerprintScheme;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Outcome of an issuance attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// A new record was stored
    Created,
    /// A record with the same fingerprint was already stored
    AlreadyExists,
}

/// The four source fields of a degree record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeFields {
    pub student_name: String,
    pub student_id: String,
    pub degree_name: String,

    /// Accepted as a JSON string or integer, stored as text
    #[serde(deserialize_with = "text_or_integer")]
    pub year_of_passing: String,
}

impl DegreeFields {
    pub fn new(
        student_name: impl Into<String>,
        student_id: impl Into<String>,
        degree_name: impl Into<String>,
        year_of_passing: impl Into<String>,
    ) -> Self {
        Self {
            student_name: student_name.into(),
            student_id: student_id.into(),
            degree_name: degree_name.into(),
            year_of_passing: year_of_passing.into(),
        }
    }

    /// Compute this tuple's fingerprint under the given scheme.
    pub fn fingerprint(&self, scheme: FingerprintScheme) -> String {
        scheme.fingerprint(
            &self.student_name,
            &self.student_id,
            &self.degree_name,
            &self.year_of_passing,
        )
    }

    /// Names of fields that are empty or whitespace only.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("student_name", &self.student_name),
            ("student_id", &self.student_id),
            ("degree_name", &self.degree_name),
            ("year_of_passing", &self.year_of_passing),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// An issued degree record.
///
/// Records are immutable once stored; the registry hands out clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DegreeRecord {
    #[schema(example = "Alice Smith")]
    pub student_name: String,
    #[schema(example = "S123")]
    pub student_id: String,
    #[schema(example = "BSc Computer Science")]
    pub degree_name: String,
    #[schema(example = "2023")]
    pub year_of_passing: String,

    /// Content fingerprint, the record's identity
    #[schema(example = "0xace7bebc94fffc3a5e16c1d7af964fbde87d740c646aed112bb248aba324b526")]
    pub fingerprint: String,

    /// When the record was first issued
    pub issued_at: DateTime<Utc>,
}

impl DegreeRecord {
    /// Build a record from its fields and precomputed fingerprint.
    pub fn issue(fields: DegreeFields, fingerprint: String) -> Self {
        Self {
            student_name: fields.student_name,
            student_id: fields.student_id,
            degree_name: fields.degree_name,
            year_of_passing: fields.year_of_passing,
            fingerprint,
            issued_at: Utc::now(),
        }
    }

    /// The source fields this record was fingerprinted from.
    pub fn fields(&self) -> DegreeFields {
        DegreeFields::new(
            self.student_name.clone(),
            self.student_id.clone(),
            self.degree_name.clone(),
            self.year_of_passing.clone(),
        )
    }

    /// Check that the stored fingerprint matches the fields under `scheme`.
    pub fn is_consistent(&self, scheme: FingerprintScheme) -> bool {
        scheme.fingerprint(
            &self.student_name,
            &self.student_id,
            &self.degree_name,
            &self.year_of_passing,
        ) == self.fingerprint
    }
}

/// Result of [`RegistryService::issue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueOutcome {
    pub fingerprint: String,
    pub status: IssueStatus,
    pub record: DegreeRecord,
}

/// A JSON string or integer, read as text.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum TextOrInteger {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl From<TextOrInteger> for String {
    fn from(value: TextOrInteger) -> Self {
        match value {
            TextOrInteger::Text(s) => s,
            TextOrInteger::Unsigned(n) => n.to_string(),
            TextOrInteger::Signed(n) => n.to_string(),
        }
    }
}

fn text_or_integer<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    TextOrInteger::deserialize(deserializer).map(String::from)
}
