use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use encyc_config::GenerationConfig;
use encyc_prompt::FidelityPromptSpec;
use encyc_utils::error::LlmError;
use encyc_utils::types::GenerationMode;

/// Body of one ask-faculty call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub faculty_id: String,
    pub message: String,
    /// Mode tag, sent as `context` on the wire.
    pub context: GenerationMode,
    pub use_rag: bool,
    pub use_commonplace: bool,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationRequest {
    /// Request with sampling flags taken from `[generation]`.
    #[must_use]
    pub fn new(
        faculty_id: impl Into<String>,
        message: impl Into<String>,
        context: GenerationMode,
        max_tokens: u32,
        generation: &GenerationConfig,
    ) -> Self {
        Self {
            faculty_id: faculty_id.into(),
            message: message.into(),
            context,
            use_rag: generation.use_rag,
            use_commonplace: generation.use_commonplace,
            temperature: generation.temperature,
            max_tokens,
        }
    }
}

/// Verdict of the voice fidelity evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FidelityReport {
    pub passed: bool,
    /// 0-100. Fractional or out-of-range answers are rounded and clamped.
    #[serde(deserialize_with = "score_from_number")]
    pub score: u32,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl FidelityReport {
    /// Reported when no evaluator key is configured.
    #[must_use]
    pub fn skipped() -> Self {
        Self::pass_with(100)
    }

    /// Reported when the evaluator call or its answer is unusable.
    #[must_use]
    pub fn fallback() -> Self {
        Self::pass_with(85)
    }

    fn pass_with(score: u32) -> Self {
        Self {
            passed: true,
            score,
            issues: Vec::new(),
            suggestions: Vec::new(),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn score_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Err(serde::de::Error::custom("score is not a finite number"));
    }
    Ok(raw.clamp(0.0, 100.0).round() as u32)
}

/// Text generation in a faculty member's voice.
///
/// One call, one attempt. A non-2xx answer is [`LlmError::Upstream`].
#[async_trait]
pub trait FacultyBackend: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError>;
}

/// Voice fidelity scoring. Infallible: failures degrade to a default pass.
#[async_trait]
pub trait FidelityEvaluator: Send + Sync {
    async fn evaluate(&self, spec: &FidelityPromptSpec<'_>) -> FidelityReport;
}
