//! Shared HTTP client for the remote text services
//!
//! One `reqwest::Client` is built per process and shared by every backend,
//! with a connect timeout and a per-request timeout. Requests are sent exactly
//! once: the workflows decide what a failure means, so nothing is retried here.

use encyc_utils::error::LlmError;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, RequestBuilder, Response};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default request timeout (5 minutes). Long entries take a while.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Default connect timeout (30 seconds)
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upstream bodies are kept in errors up to this many characters.
const MAX_ERROR_BODY_CHARS: usize = 2000;

#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    request_timeout: Duration,
}

impl HttpClient {
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the client cannot be constructed
    pub fn new() -> Result<Self, LlmError> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the client cannot be constructed
    pub fn with_timeout(request_timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .timeout(request_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| LlmError::Misconfiguration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client: Arc::new(client),
            request_timeout,
        })
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Start a POST request on the shared client.
    #[must_use]
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    /// Send a request once and require a 2xx answer.
    ///
    /// # Errors
    ///
    /// - `LlmError::Timeout` when the request timeout elapses
    /// - `LlmError::Transport` for connection and I/O failures (message redacted)
    /// - `LlmError::Upstream` for any non-2xx status, carrying the status and body
    pub async fn send(&self, request: RequestBuilder, service: &str) -> Result<Response, LlmError> {
        debug!(
            service = service,
            timeout_secs = self.request_timeout.as_secs(),
            "Sending HTTP request"
        );

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout {
                    duration: self.request_timeout,
                }
            } else {
                LlmError::Transport(format!(
                    "{service} request failed: {}",
                    redact_error_message(&e.to_string())
                ))
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let body: String = redact_error_message(&body)
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect();
        debug!(service = service, status = status.as_u16(), "Upstream returned an error status");

        Err(LlmError::Upstream {
            status: status.as_u16(),
            body,
        })
    }
}

/// Pattern to match URLs with embedded credentials
static URL_WITH_CREDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(https?://)[^:@\s]+:[^@\s]+@").unwrap());

/// Pattern to match potential API keys (long alphanumeric strings)
static POTENTIAL_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^A-Za-z0-9_-])[A-Za-z0-9_-]{32,}(?:[^A-Za-z0-9_-]|$)").unwrap()
});

/// Pattern to match bearer tokens echoed back in error bodies
static BEARER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(bearer\s+)[A-Za-z0-9._~+/=-]+").unwrap());

/// Redact sensitive information from error messages before they are logged.
///
/// - URLs with embedded credentials lose the credentials
/// - bearer tokens are replaced
/// - long key-like strings are replaced
#[must_use]
pub fn redact_error_message(message: &str) -> String {
    let redacted = URL_WITH_CREDS.replace_all(message, "$1[REDACTED]@");
    let redacted = BEARER_TOKEN.replace_all(&redacted, "$1[REDACTED]");
    let redacted = POTENTIAL_KEY.replace_all(&redacted, "[REDACTED_KEY]");
    redacted.to_string()
}
