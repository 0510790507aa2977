//! Remote text services used by the pipeline.
//!
//! - [`AskFacultyBackend`]: the ask-faculty edge function that writes drafts,
//!   reviews, revisions and marginalia in a faculty member's voice
//! - [`OpenRouterEvaluator`]: the voice fidelity evaluator; never fails the caller
//!
//! Both speak through one shared [`HttpClient`] with a connect timeout and a
//! request timeout. Neither retries.

mod faculty_backend;
mod http_client;
mod openrouter_evaluator;
mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use faculty_backend::AskFacultyBackend;
pub use http_client::{HttpClient, redact_error_message};
pub use openrouter_evaluator::{OpenRouterEvaluator, extract_report};
pub use types::{FacultyBackend, FidelityEvaluator, FidelityReport, GenerationRequest};

pub use encyc_utils::error::LlmError;
