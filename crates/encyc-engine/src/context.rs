use camino::{Utf8Path, Utf8PathBuf};
use std::time::Duration;

use encyc_config::{GenerationConfig, PacingConfig, Registry};
use encyc_entry::entries_dir;
use encyc_llm::{FacultyBackend, FidelityEvaluator, GenerationRequest, LlmError};
use encyc_utils::types::{Edition, GenerationMode};

/// Everything a workflow needs, borrowed from the caller.
///
/// The registry is loaded once by the CLI and shared here; no workflow keeps
/// its own copy of the assignment table.
#[derive(Clone, Copy)]
pub struct PipelineContext<'a> {
    pub registry: &'a Registry,
    pub backend: &'a dyn FacultyBackend,
    pub evaluator: &'a dyn FidelityEvaluator,
    pub generation: &'a GenerationConfig,
    pub pacing: &'a PacingConfig,
    pub content_root: &'a Utf8Path,
}

impl PipelineContext<'_> {
    /// One ask-faculty call with the configured sampling flags.
    pub async fn generate(
        &self,
        faculty_id: &str,
        prompt: String,
        mode: GenerationMode,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let request = GenerationRequest::new(faculty_id, prompt, mode, max_tokens, self.generation);
        self.backend.generate(&request).await
    }

    #[must_use]
    pub fn entries_dir(&self, volume_slug: &str, edition: Edition) -> Utf8PathBuf {
        entries_dir(self.content_root, volume_slug, edition)
    }
}

/// Sleep for `duration`; zero returns immediately.
pub async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

/// `.adoc` files directly under `dir`, sorted by name. A missing directory
/// yields an empty list.
///
/// # Errors
///
/// Fails when the directory exists but cannot be listed.
pub fn entry_files(dir: &Utf8Path) -> anyhow::Result<Vec<Utf8PathBuf>> {
    use anyhow::Context;

    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for item in dir
        .read_dir_utf8()
        .with_context(|| format!("Failed to list entries in {dir}"))?
    {
        let item = item.with_context(|| format!("Failed to list entries in {dir}"))?;
        let path = item.path();
        if path.extension() == Some("adoc") && path.is_file() {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Success/failure counts for a multi-entry run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct RunTally {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunTally {
    pub fn absorb(&mut self, other: RunTally) {
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }

    #[must_use]
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }
}
