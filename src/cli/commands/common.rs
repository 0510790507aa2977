//! Helpers shared by the generation commands.

use anyhow::Result;

use encyc_config::{Config, Registry, evaluator_api_key, resolve_faculty_credentials};
use encyc_engine::{PipelineContext, WorkflowError};
use encyc_llm::{AskFacultyBackend, HttpClient, OpenRouterEvaluator};
use encyc_utils::error::{EncycError, ValidationError};

/// Remote services built once per invocation over one shared HTTP client.
pub struct Services {
    backend: AskFacultyBackend,
    evaluator: OpenRouterEvaluator,
}

impl Services {
    /// # Errors
    ///
    /// Missing ask-faculty credentials or an HTTP client that cannot be built.
    /// A missing evaluator key only disables fidelity checks.
    pub fn from_config(config: &Config) -> Result<Self> {
        let credentials = resolve_faculty_credentials(&config.faculty).map_err(EncycError::from)?;
        let client = HttpClient::with_timeout(config.generation.timeout()).map_err(EncycError::from)?;
        let api_key = evaluator_api_key(&config.evaluator);

        Ok(Self {
            backend: AskFacultyBackend::with_client(client.clone(), &credentials),
            evaluator: OpenRouterEvaluator::with_client(client, &config.evaluator, api_key),
        })
    }

    pub fn context<'a>(&'a self, config: &'a Config, registry: &'a Registry) -> PipelineContext<'a> {
        PipelineContext {
            registry,
            backend: &self.backend,
            evaluator: &self.evaluator,
            generation: &config.generation,
            pacing: &config.pacing,
            content_root: &config.paths.content_root,
        }
    }
}

/// Registry slug for a volume number.
///
/// # Errors
///
/// [`ValidationError::UnknownVolume`] for numbers the registry does not know.
pub fn volume_slug(registry: &Registry, volume: u32) -> Result<String> {
    registry
        .volume_slug(volume)
        .map(str::to_string)
        .ok_or_else(|| EncycError::from(ValidationError::UnknownVolume(volume)).into())
}

/// Convert a workflow failure for reporting, keeping the upstream cause
/// reachable for exit-code mapping.
pub fn workflow_failure(err: WorkflowError) -> anyhow::Error {
    let summary = err.to_string();
    match err {
        WorkflowError::Generation { source, .. } => {
            anyhow::Error::new(EncycError::from(source)).context(summary)
        }
        other @ WorkflowError::Persistence { .. } => anyhow::Error::new(other),
    }
}
