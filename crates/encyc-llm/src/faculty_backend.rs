//! ask-faculty edge function client.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use encyc_config::FacultyCredentials;
use encyc_utils::error::LlmError;

use crate::http_client::HttpClient;
use crate::types::{FacultyBackend, GenerationRequest};

const FUNCTION_PATH: &str = "/functions/v1/ask-faculty";

/// Generation backend that POSTs to `{base_url}/functions/v1/ask-faculty`.
#[derive(Clone)]
pub struct AskFacultyBackend {
    client: HttpClient,
    endpoint: String,
    key: String,
}

impl AskFacultyBackend {
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the HTTP client cannot be constructed
    pub fn new(credentials: &FacultyCredentials, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self::with_client(HttpClient::with_timeout(timeout)?, credentials))
    }

    /// Backend sharing an existing client.
    #[must_use]
    pub fn with_client(client: HttpClient, credentials: &FacultyCredentials) -> Self {
        Self {
            client,
            endpoint: format!(
                "{}{FUNCTION_PATH}",
                credentials.base_url.trim_end_matches('/')
            ),
            key: credentials.key.clone(),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl FacultyBackend for AskFacultyBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        debug!(
            faculty_id = %request.faculty_id,
            mode = %request.context,
            max_tokens = request.max_tokens,
            prompt_chars = request.message.chars().count(),
            "Calling ask-faculty"
        );

        let builder = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.key))
            .header("apikey", self.key.as_str())
            .header("Content-Type", "application/json")
            .json(request);

        let response = self.client.send(builder, "ask-faculty").await?;

        let body: AskFacultyResponse = response.json().await.map_err(|e| {
            LlmError::InvalidResponse(format!("Failed to parse ask-faculty response: {e}"))
        })?;

        let text = body.response.unwrap_or_default();
        debug!(
            faculty_id = %request.faculty_id,
            words = text.split_whitespace().count(),
            "ask-faculty returned"
        );
        Ok(text)
    }
}

/// Only the `response` field matters; a missing or null one means empty text.
#[derive(Debug, Deserialize)]
struct AskFacultyResponse {
    #[serde(default)]
    response: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(base_url: &str) -> FacultyCredentials {
        FacultyCredentials {
            base_url: base_url.to_string(),
            key: "service-key".to_string(),
        }
    }

    #[test]
    fn test_endpoint_joins_function_path() {
        let backend =
            AskFacultyBackend::new(&credentials("https://proj.supabase.co"), Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            backend.endpoint(),
            "https://proj.supabase.co/functions/v1/ask-faculty"
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let backend =
            AskFacultyBackend::new(&credentials("https://proj.supabase.co/"), Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            backend.endpoint(),
            "https://proj.supabase.co/functions/v1/ask-faculty"
        );
    }

    #[test]
    fn test_missing_response_field_is_empty() {
        let body: AskFacultyResponse = serde_json::from_str(r#"{"other": 1}"#).unwrap();
        assert_eq!(body.response.unwrap_or_default(), "");

        let body: AskFacultyResponse = serde_json::from_str(r#"{"response": null}"#).unwrap();
        assert!(body.response.is_none());
    }
}
