//! Degree registry HTTP client.

use crate::error::ClientError;
use crate::types::*;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Degree registry API client.
#[derive(Clone)]
pub struct RegistryClient {
    client: Client,
    base_url: String,
}

impl RegistryClient {
    /// Create a new registry client.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a new registry client with a custom request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the registry is healthy.
    pub async fn health_check(&self) -> bool {
        self.client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Fetch health details.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        decode(response).await
    }

    /// Issue a degree.
    #[instrument(skip(self, request), fields(student_id = %request.student_id))]
    pub async fn issue(&self, request: &IssueRequest) -> Result<IssueResponse, ClientError> {
        let response = self
            .client
            .post(format!("{}/issue-degree", self.base_url))
            .json(request)
            .send()
            .await?;

        let issued: IssueResponse = decode(response).await?;
        debug!(degree_hash = %issued.degree_hash, status = ?issued.status, "Issued degree");
        Ok(issued)
    }

    /// Verify a degree by fingerprint.
    #[instrument(skip(self))]
    pub async fn verify(&self, degree_hash: &str) -> Result<VerifyResponse, ClientError> {
        let response = self
            .client
            .post(format!("{}/verify-degree", self.base_url))
            .json(&VerifyRequest { degree_hash })
            .send()
            .await?;

        decode(response).await
    }

    /// List all issued degrees.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<DegreesResponse, ClientError> {
        let response = self
            .client
            .get(format!("{}/degrees", self.base_url))
            .send()
            .await?;

        let degrees: DegreesResponse = decode(response).await?;
        debug!("Listed {} degrees", degrees.total);
        Ok(degrees)
    }
}

/// Decode a success body, or turn an error body into `ClientError::Api`.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let (code, message) = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(e) => (e.code, e.error),
            Err(_) => (String::new(), body),
        };
        warn!(status = status.as_u16(), %code, "Registry returned error: {}", message);
        return Err(ClientError::Api {
            status: status.as_u16(),
            code,
            message,
        });
    }

    Ok(serde_json::from_str(&body)?)
}
