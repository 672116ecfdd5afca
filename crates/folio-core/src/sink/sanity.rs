//! Sanity CMS sink
//!
//! Writes each document through the Sanity mutation API:
//!
//! ```text
//! POST https://<project>.api.sanity.io/v<api_version>/data/mutate/<dataset>
//! Authorization: Bearer <token>
//! {"mutations":[{"create":{"_type":"contact", ...}}]}
//! ```
//!
//! Only the status of the response matters; the body is read solely to give
//! operators a useful error message.

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;
use url::Url;

use super::{PersistenceSink, SinkError};
use crate::types::ContactDocument;
use crate::{Error, Result};

/// API version used when none is configured
pub const DEFAULT_SANITY_API_VERSION: &str = "2024-01-01";

/// Connection settings for a Sanity project
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SanityConfig {
    pub project_id: Option<String>,
    pub dataset: Option<String>,
    pub api_version: String,
    /// Write token; never logged
    pub token: Option<String>,
    /// Full base URL override, e.g. a proxy or a local test server
    pub api_host: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            dataset: None,
            api_version: DEFAULT_SANITY_API_VERSION.to_string(),
            token: None,
            api_host: None,
            timeout_secs: 30,
        }
    }
}

impl fmt::Debug for SanityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SanityConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("api_host", &self.api_host)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SanityConfig {
    pub fn new(
        project_id: impl Into<String>,
        dataset: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            project_id: Some(project_id.into()),
            dataset: Some(dataset.into()),
            token: Some(token.into()),
            ..Default::default()
        }
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = Some(host.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Fill unset values from the environment.
    ///
    /// Reads `SANITY_PROJECT_ID`, `SANITY_DATASET`, `SANITY_API_VERSION` and
    /// `SANITY_SERVER_API_TOKEN`, falling back to the `NEXT_PUBLIC_` variants
    /// for project id and dataset.
    pub fn merge_with_env(&mut self) {
        fn env_any(keys: &[&str]) -> Option<String> {
            keys.iter()
                .find_map(|k| std::env::var(k).ok())
                .filter(|v| !v.is_empty())
        }

        if let Some(project_id) =
            env_any(&["SANITY_PROJECT_ID", "NEXT_PUBLIC_SANITY_PROJECT_ID"])
        {
            self.project_id = Some(project_id);
        }
        if let Some(dataset) = env_any(&["SANITY_DATASET", "NEXT_PUBLIC_SANITY_DATASET"]) {
            self.dataset = Some(dataset);
        }
        if let Some(version) = env_any(&["SANITY_API_VERSION", "NEXT_PUBLIC_SANITY_API_VERSION"]) {
            self.api_version = version;
        }
        if let Some(token) = env_any(&["SANITY_SERVER_API_TOKEN", "SANITY_API_TOKEN"]) {
            self.token = Some(token);
        }
    }

    /// Check that everything needed for a write is present
    pub fn validate(&self) -> Result<()> {
        let missing = |value: &Option<String>| value.as_deref().map_or(true, str::is_empty);

        if missing(&self.project_id) {
            return Err(Error::configuration(
                "Sanity project id not configured. Set sanity.project_id or SANITY_PROJECT_ID",
            ));
        }
        if missing(&self.dataset) {
            return Err(Error::configuration(
                "Sanity dataset not configured. Set sanity.dataset or SANITY_DATASET",
            ));
        }
        if missing(&self.token) {
            return Err(Error::configuration(
                "Sanity write token not configured. Set SANITY_SERVER_API_TOKEN",
            ));
        }
        if self.api_version.trim_start_matches('v').is_empty() {
            return Err(Error::configuration("Sanity API version must not be empty"));
        }
        Ok(())
    }

    /// Mutation endpoint for the configured project and dataset
    pub fn mutate_url(&self) -> Result<Url> {
        self.validate()?;
        let project_id = self.project_id.as_deref().unwrap_or_default();
        let dataset = self.dataset.as_deref().unwrap_or_default();
        let version = self.api_version.trim_start_matches('v');

        let base = match &self.api_host {
            Some(host) => host.trim_end_matches('/').to_string(),
            None => format!("https://{}.api.sanity.io", project_id),
        };

        let raw = format!("{}/v{}/data/mutate/{}", base, version, dataset);
        Url::parse(&raw).map_err(|e| Error::Configuration {
            message: format!("Invalid Sanity endpoint '{}': {}", raw, e),
            source: Some(anyhow::Error::new(e)),
        })
    }
}

/// Persists contact documents into a Sanity dataset
#[derive(Debug)]
pub struct SanitySink {
    client: ReqwestClient,
    endpoint: Url,
    token: String,
}

impl SanitySink {
    pub fn new(config: SanityConfig) -> Result<Self> {
        let endpoint = config.mutate_url()?;
        let token = config.token.clone().unwrap_or_default();

        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Http {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(anyhow::Error::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Request body creating `document`
    pub fn mutation_body(document: &ContactDocument) -> std::result::Result<Value, SinkError> {
        Ok(json!({ "mutations": [{ "create": serde_json::to_value(document)? }] }))
    }
}

#[async_trait]
impl PersistenceSink for SanitySink {
    fn name(&self) -> &'static str {
        "sanity"
    }

    async fn persist(&self, document: &ContactDocument) -> std::result::Result<(), SinkError> {
        let body = Self::mutation_body(document)?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "Sanity accepted mutation");
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        Err(SinkError::Rejected {
            status: status.as_u16(),
            message: extract_error_message(&text),
        })
    }
}

/// Pull a readable message out of a Sanity error body.
///
/// Sanity answers either `{"error":{"description":"...","type":"..."}}` or
/// `{"error":"Unauthorized","message":"...","statusCode":401}`.
fn extract_error_message(body: &str) -> String {
    const MAX_RAW_LEN: usize = 512;

    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(description) = json
            .get("error")
            .and_then(|e| e.get("description"))
            .and_then(Value::as_str)
        {
            return description.to_string();
        }
        if let Some(message) = json.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
        if let Some(error) = json.get("error").and_then(Value::as_str) {
            return error.to_string();
        }
    }

    if body.is_empty() {
        return "empty response body".to_string();
    }
    body.chars().take(MAX_RAW_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContactSubmission;
    use chrono::{TimeZone, Utc};

    fn config() -> SanityConfig {
        SanityConfig::new("abc123", "production", "sk-secret-token")
    }

    #[test]
    fn test_mutate_url() {
        let url = config().mutate_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://abc123.api.sanity.io/v2024-01-01/data/mutate/production"
        );

        let url = config()
            .with_api_version("v2021-06-07")
            .with_api_host("http://127.0.0.1:8080/")
            .mutate_url()
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/v2021-06-07/data/mutate/production"
        );
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let mut cfg = config();
        cfg.token = None;
        let err = SanityConfig::validate(&cfg).unwrap_err();
        assert!(err.to_string().contains("SANITY_SERVER_API_TOKEN"));

        let mut cfg = config();
        cfg.project_id = Some(String::new());
        assert!(SanitySink::new(cfg).is_err());

        let mut cfg = config();
        cfg.dataset = None;
        assert!(cfg.validate().unwrap_err().to_string().contains("dataset"));
    }

    #[test]
    fn test_debug_hides_token() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("sk-secret-token"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn test_mutation_body_shape() {
        let submission = ContactSubmission {
            name: "Al".to_string(),
            email: "a@b.com".to_string(),
            subject: "Hello there".to_string(),
            message: "This is a test message.".to_string(),
            honeypot: Some(String::new()),
        };
        let at = Utc.with_ymd_and_hms(2025, 1, 31, 12, 0, 0).unwrap();
        let doc = ContactDocument::from_submission(&submission, at);

        let body = SanitySink::mutation_body(&doc).unwrap();
        let created = &body["mutations"][0]["create"];
        assert_eq!(created["_type"], "contact");
        assert_eq!(created["status"], "new");
        assert_eq!(created["submittedAt"], "2025-01-31T12:00:00.000Z");
        assert!(created.get("address").is_none());
    }

    #[test]
    fn test_extract_error_message() {
        assert_eq!(
            extract_error_message(r#"{"error":{"description":"Mutation failed","type":"mutationError"}}"#),
            "Mutation failed"
        );
        assert_eq!(
            extract_error_message(r#"{"error":"Unauthorized","message":"Session not found","statusCode":401}"#),
            "Session not found"
        );
        assert_eq!(extract_error_message(r#"{"error":"Forbidden"}"#), "Forbidden");
        assert_eq!(extract_error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(extract_error_message(""), "empty response body");
    }
}
