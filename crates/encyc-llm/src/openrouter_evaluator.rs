//! OpenRouter voice fidelity evaluator
//!
//! Sends the fidelity prompt to an OpenAI-compatible chat-completions endpoint
//! and parses the first `{...}` span of the answer as a [`FidelityReport`].
//! Every failure path ends in a default pass so the workflow never stops here.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use encyc_config::EvaluatorConfig;
use encyc_prompt::{FidelityPromptSpec, build_fidelity_prompt};
use encyc_utils::error::LlmError;

use crate::http_client::{HttpClient, redact_error_message};
use crate::types::{FidelityEvaluator, FidelityReport};

const SYSTEM_PROMPT: &str = "You are a voice fidelity evaluator. Respond only with valid JSON.";

static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

#[derive(Clone)]
pub struct OpenRouterEvaluator {
    client: HttpClient,
    base_url: String,
    /// `None` disables the evaluator; every call reports [`FidelityReport::skipped`].
    api_key: Option<String>,
    model: String,
    temperature: f32,
}

impl OpenRouterEvaluator {
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the HTTP client cannot be constructed
    pub fn new(
        config: &EvaluatorConfig,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self::with_client(HttpClient::with_timeout(timeout)?, config, api_key))
    }

    /// Evaluator sharing an existing client.
    #[must_use]
    pub fn with_client(client: HttpClient, config: &EvaluatorConfig, api_key: Option<String>) -> Self {
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            warn!(
                env_var = %config.api_key_env,
                "Evaluator key not set, skipping voice fidelity checks"
            );
        }
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn request_report(&self, api_key: &str, prompt: String) -> Result<FidelityReport, LlmError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
        };

        let builder = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&body);

        let response = self.client.send(builder, "openrouter").await?;
        let parsed: ChatResponse = response.json().await.map_err(|e| {
            LlmError::InvalidResponse(format!("Failed to parse OpenRouter response: {e}"))
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        extract_report(&content).ok_or_else(|| {
            LlmError::InvalidResponse("Evaluator answer holds no fidelity JSON".to_string())
        })
    }
}

#[async_trait]
impl FidelityEvaluator for OpenRouterEvaluator {
    async fn evaluate(&self, spec: &FidelityPromptSpec<'_>) -> FidelityReport {
        let Some(api_key) = self.api_key.as_deref() else {
            return FidelityReport::skipped();
        };

        match self.request_report(api_key, build_fidelity_prompt(spec)).await {
            Ok(report) => {
                debug!(
                    faculty_id = %spec.faculty_id,
                    context = %spec.context,
                    score = report.score,
                    passed = report.passed,
                    "Voice fidelity evaluated"
                );
                report
            }
            Err(e) => {
                warn!(
                    faculty_id = %spec.faculty_id,
                    error = %redact_error_message(&e.to_string()),
                    "Voice fidelity check failed, using default pass"
                );
                FidelityReport::fallback()
            }
        }
    }
}

/// Parse the first `{` through the last `}` of an evaluator answer.
///
/// Prose or code fences around the object are ignored. `None` when there is
/// no object or it does not decode as a report.
#[must_use]
pub fn extract_report(content: &str) -> Option<FidelityReport> {
    let object = JSON_OBJECT.find(content)?;
    serde_json::from_str(object.as_str()).ok()
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_object() {
        let report =
            extract_report(r#"{"passed": true, "score": 92, "issues": [], "suggestions": []}"#)
                .unwrap();
        assert!(report.passed);
        assert_eq!(report.score, 92);
    }

    #[test]
    fn test_extract_ignores_surrounding_prose() {
        let content = "Here is my evaluation:\n```json\n{\n  \"passed\": false,\n  \"score\": 61,\n  \"issues\": [\"modern idiom\"],\n  \"suggestions\": [\"drop slang\"]\n}\n```\nHope this helps.";
        let report = extract_report(content).unwrap();
        assert!(!report.passed);
        assert_eq!(report.score, 61);
        assert_eq!(report.issues, vec!["modern idiom"]);
        assert_eq!(report.suggestions, vec!["drop slang"]);
    }

    #[test]
    fn test_extract_keeps_fractional_score() {
        let report = extract_report(r#"Verdict: {"passed": true, "score": 87.5, "issues": []}"#).unwrap();
        assert_ne!(report, FidelityReport::fallback());
        assert_eq!(report.score, 88);
    }

    #[test]
    fn test_extract_rejects_missing_or_bad_json() {
        assert!(extract_report("no json here").is_none());
        assert!(extract_report("{not json}").is_none());
        assert!(extract_report("{}").is_none());
    }

    #[tokio::test]
    async fn test_disabled_evaluator_skips() {
        let evaluator =
            OpenRouterEvaluator::new(&EvaluatorConfig::default(), None, Duration::from_secs(5))
                .unwrap();
        assert!(!evaluator.is_enabled());

        let spec = FidelityPromptSpec {
            text: "text",
            faculty_id: "a.james",
            faculty_name: "William James",
            context: "marginalia",
        };
        assert_eq!(evaluator.evaluate(&spec).await, FidelityReport::skipped());
    }

    #[test]
    fn test_blank_key_disables() {
        let evaluator = OpenRouterEvaluator::new(
            &EvaluatorConfig::default(),
            Some("  ".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        assert!(!evaluator.is_enabled());
    }
}
