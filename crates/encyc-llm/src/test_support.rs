//! In-memory backends for workflow tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use encyc_prompt::FidelityPromptSpec;
use encyc_utils::error::LlmError;

use crate::types::{FacultyBackend, FidelityEvaluator, FidelityReport, GenerationRequest};

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum Scripted {
    Text(String),
    /// Fail with `LlmError::Upstream` and this status.
    Status(u16),
}

/// Generation backend that replays a script and records every request.
///
/// Once the script runs out, every call answers with the fallback text.
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Scripted>>,
    fallback: String,
    requests: Mutex<Vec<GenerationRequest>>,
    call_count: AtomicU32,
}

impl ScriptedBackend {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: fallback.into(),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicU32::new(0),
        }
    }

    /// Queue a successful answer.
    pub fn then_text(self, text: impl Into<String>) -> Self {
        self.push(Scripted::Text(text.into()))
    }

    /// Queue a failing answer.
    pub fn then_status(self, status: u16) -> Self {
        self.push(Scripted::Status(status))
    }

    fn push(self, step: Scripted) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(step);
        }
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every request received so far, in call order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new("Generated text.")
    }
}

#[async_trait]
impl FacultyBackend for ScriptedBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let step = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match step {
            Some(Scripted::Text(text)) => Ok(text),
            Some(Scripted::Status(status)) => Err(LlmError::Upstream {
                status,
                body: "scripted failure".to_string(),
            }),
            None => Ok(self.fallback.clone()),
        }
    }
}

/// Evaluator that always returns the same report and counts calls.
pub struct FixedEvaluator {
    report: FidelityReport,
    contexts: Mutex<Vec<String>>,
}

impl FixedEvaluator {
    pub fn new(report: FidelityReport) -> Self {
        Self {
            report,
            contexts: Mutex::new(Vec::new()),
        }
    }

    /// Context labels of every evaluation so far.
    pub fn contexts(&self) -> Vec<String> {
        self.contexts.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Default for FixedEvaluator {
    fn default() -> Self {
        Self::new(FidelityReport::skipped())
    }
}

#[async_trait]
impl FidelityEvaluator for FixedEvaluator {
    async fn evaluate(&self, spec: &FidelityPromptSpec<'_>) -> FidelityReport {
        if let Ok(mut contexts) = self.contexts.lock() {
            contexts.push(spec.context.to_string());
        }
        self.report.clone()
    }
}
