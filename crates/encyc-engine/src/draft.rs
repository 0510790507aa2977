//! Single-pass drafting without review.

use camino::Utf8PathBuf;
use serde::Serialize;
use tracing::{Instrument, error, info, warn};

use encyc_entry::{EntryMetadata, entry_path, patch_canonical, title_from_slug, word_count};
use encyc_llm::LlmError;
use encyc_prompt::{EntryPromptSpec, build_entry_prompt, max_tokens};
use encyc_utils::atomic_write::write_file_atomic;
use encyc_utils::error::PatchError;
use encyc_utils::logging::entry_span;
use encyc_utils::types::{Edition, EntryType, GenerationMode};

use crate::context::{PipelineContext, RunTally, entry_files, pause};
use crate::workflow::{Stage, WorkflowError};

/// One entry to draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRequest {
    pub volume_slug: String,
    pub edition: Edition,
    pub entry_slug: String,
    pub faculty_id: String,
    /// Overrides the entry file's `:entry-type:`.
    pub entry_type: Option<EntryType>,
}

/// Where a draft ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DraftOutcome {
    Patched { path: Utf8PathBuf, words: usize },
    /// No entry file; the caller prints the text.
    Unsaved { text: String },
    /// File present but without a canonical block; nothing written.
    NoCanonicalBlock { path: Utf8PathBuf, text: String },
}

pub struct DraftGenerator<'a> {
    ctx: PipelineContext<'a>,
}

impl<'a> DraftGenerator<'a> {
    #[must_use]
    pub fn new(ctx: PipelineContext<'a>) -> Self {
        Self { ctx }
    }

    /// Draft one entry as its author and patch it into the entry file when
    /// one exists.
    ///
    /// # Errors
    ///
    /// Generation failures and write failures; a missing file or canonical
    /// block is reported through [`DraftOutcome`] instead.
    pub async fn draft_entry(&self, request: &DraftRequest) -> Result<DraftOutcome, WorkflowError> {
        let span = entry_span(
            &request.entry_slug,
            &request.edition.to_string(),
            &request.faculty_id,
        );
        self.draft_inner(request).instrument(span).await
    }

    async fn draft_inner(&self, request: &DraftRequest) -> Result<DraftOutcome, WorkflowError> {
        let path = entry_path(
            self.ctx.content_root,
            &request.volume_slug,
            request.edition,
            &request.entry_slug,
        );
        let metadata = if path.exists() {
            EntryMetadata::read(&path, request.edition)
                .inspect_err(|e| warn!(path = %path, error = %e, "Could not read entry metadata"))
                .ok()
        } else {
            None
        };

        let mut spec = metadata.as_ref().map_or_else(
            || {
                EntryPromptSpec::new(
                    title_from_slug(&request.entry_slug),
                    request.edition,
                    request.entry_type.unwrap_or_default(),
                )
            },
            EntryMetadata::prompt_spec,
        );
        if let Some(entry_type) = request.entry_type {
            spec.entry_type = entry_type;
        }

        let text = self.generate(&request.entry_slug, &request.faculty_id, &spec).await?;

        if !path.exists() {
            info!(slug = %request.entry_slug, "No entry file, returning text unsaved");
            return Ok(DraftOutcome::Unsaved { text });
        }
        self.write(path, text)
    }

    /// Draft every assigned entry of a volume edition, optionally only `only`.
    ///
    /// Entries without a faculty id are skipped with a warning. A failing
    /// entry is logged and counted; the pass carries on.
    ///
    /// # Errors
    ///
    /// Fails only when the entries directory cannot be listed.
    pub async fn draft_volume(
        &self,
        volume_slug: &str,
        edition: Edition,
        only: Option<&str>,
    ) -> anyhow::Result<RunTally> {
        let dir = self.ctx.entries_dir(volume_slug, edition);
        let mut files = entry_files(&dir)?;
        if files.is_empty() {
            warn!(dir = %dir, edition = %edition, "No entry files found");
            return Ok(RunTally::default());
        }
        if let Some(slug) = only {
            files.retain(|p| p.file_stem() == Some(slug));
            if files.is_empty() {
                warn!(entry = slug, edition = %edition, "No matching entry found");
                return Ok(RunTally::default());
            }
        }

        info!(volume = volume_slug, edition = %edition, entries = files.len(), "Drafting volume");
        let mut tally = RunTally::default();
        for (i, path) in files.iter().enumerate() {
            if i > 0 {
                pause(self.ctx.pacing.review_delay()).await;
            }
            let metadata = match EntryMetadata::read(path, edition) {
                Ok(m) => m,
                Err(e) => {
                    error!(path = %path, error = %format!("{e:#}"), "Could not read entry");
                    tally.failed += 1;
                    continue;
                }
            };
            let Some(faculty_id) = metadata.faculty_id.clone() else {
                warn!(slug = %metadata.slug, "No faculty-id, skipping");
                tally.skipped += 1;
                continue;
            };

            let result = async {
                let text = self
                    .generate(&metadata.slug, &faculty_id, &metadata.prompt_spec())
                    .await?;
                self.write(path.clone(), text)
            }
            .instrument(entry_span(&metadata.slug, &edition.to_string(), &faculty_id))
            .await;

            match result {
                Ok(_) => tally.succeeded += 1,
                Err(e) => {
                    error!(slug = %metadata.slug, error = %e, "Draft failed");
                    tally.failed += 1;
                }
            }
        }
        Ok(tally)
    }

    async fn generate(
        &self,
        slug: &str,
        faculty_id: &str,
        spec: &EntryPromptSpec,
    ) -> Result<String, WorkflowError> {
        info!(
            slug = slug,
            author = %self.ctx.registry.author_name(faculty_id),
            entry_type = %spec.entry_type,
            target = %spec.effective_word_target(),
            "Generating entry"
        );
        let text = self
            .ctx
            .generate(
                faculty_id,
                build_entry_prompt(spec),
                GenerationMode::Lecture,
                max_tokens(spec.entry_type),
            )
            .await
            .map_err(|source: LlmError| WorkflowError::Generation {
                slug: slug.to_string(),
                stage: Stage::Draft,
                source,
            })?;
        info!(slug = slug, words = word_count(&text), "Generated");
        Ok(text)
    }

    fn write(&self, path: Utf8PathBuf, text: String) -> Result<DraftOutcome, WorkflowError> {
        let current = std::fs::read_to_string(&path).map_err(|e| WorkflowError::Persistence {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let patched = match patch_canonical(&current, &text) {
            Ok(patched) => patched,
            Err(PatchError::PatternNotFound) => {
                warn!(path = %path, "Could not find canonical block, nothing written");
                return Ok(DraftOutcome::NoCanonicalBlock { path, text });
            }
        };
        write_file_atomic(&path, &patched).map_err(|e| WorkflowError::Persistence {
            path: path.clone(),
            reason: format!("{e:#}"),
        })?;
        info!(path = %path, "Updated entry file");
        Ok(DraftOutcome::Patched {
            words: word_count(&text),
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encyc_config::{GenerationConfig, PacingConfig, Registry};
    use encyc_entry::{ensure_entry, resolve};
    use encyc_llm::test_support::{FixedEvaluator, ScriptedBackend};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        root: Utf8PathBuf,
        registry: Registry,
        generation: GenerationConfig,
        pacing: PacingConfig,
        evaluator: FixedEvaluator,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
            Self {
                _dir: dir,
                root,
                registry: Registry::embedded().unwrap(),
                generation: GenerationConfig::default(),
                pacing: PacingConfig::none(),
                evaluator: FixedEvaluator::default(),
            }
        }

        fn generator<'a>(&'a self, backend: &'a ScriptedBackend) -> DraftGenerator<'a> {
            DraftGenerator::new(PipelineContext {
                registry: &self.registry,
                backend,
                evaluator: &self.evaluator,
                generation: &self.generation,
                pacing: &self.pacing,
                content_root: &self.root,
            })
        }

        fn stub(&self, topic: &str, author: &str, edition: Edition) -> Utf8PathBuf {
            let target = resolve(&self.root, "volume-01-mind", edition, topic, author, 0);
            ensure_entry(&target, author, &self.registry.author_name(author), false).unwrap();
            target.path
        }
    }

    fn request(slug: &str) -> DraftRequest {
        DraftRequest {
            volume_slug: "volume-01-mind".to_string(),
            edition: Edition::Adult,
            entry_slug: slug.to_string(),
            faculty_id: "a.james".to_string(),
            entry_type: None,
        }
    }

    #[tokio::test]
    async fn test_draft_patches_existing_entry() {
        let fx = Fixture::new();
        let path = fx.stub("attention", "a.james", Edition::Adult);
        let backend = ScriptedBackend::new("The stream of thought.");

        let outcome = fx.generator(&backend).draft_entry(&request("attention")).await.unwrap();

        assert_eq!(outcome, DraftOutcome::Patched { path: path.clone(), words: 4 });
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("====\nThe stream of thought.\n===="));
        let sent = &backend.requests()[0];
        assert_eq!(sent.context, GenerationMode::Lecture);
        assert_eq!(sent.max_tokens, 8000);
        assert!(sent.message.contains("\"Attention\""));
    }

    #[tokio::test]
    async fn test_type_override_sets_budget() {
        let fx = Fixture::new();
        fx.stub("attention", "a.james", Edition::Adult);
        let backend = ScriptedBackend::default();
        let mut req = request("attention");
        req.entry_type = Some(EntryType::Boundary);

        fx.generator(&backend).draft_entry(&req).await.unwrap();

        assert_eq!(backend.requests()[0].max_tokens, 6000);
    }

    #[tokio::test]
    async fn test_missing_file_returns_text() {
        let fx = Fixture::new();
        let backend = ScriptedBackend::new("Loose text.");

        let outcome = fx.generator(&backend).draft_entry(&request("reverie")).await.unwrap();

        assert_eq!(outcome, DraftOutcome::Unsaved { text: "Loose text.".to_string() });
        assert!(!fx.root.join("editions").exists());
    }

    #[tokio::test]
    async fn test_generation_failure_is_an_error() {
        let fx = Fixture::new();
        fx.stub("attention", "a.james", Edition::Adult);
        let backend = ScriptedBackend::default().then_status(503);

        let err = fx.generator(&backend).draft_entry(&request("attention")).await.unwrap_err();

        assert_eq!(err.stage(), Stage::Draft);
    }

    #[tokio::test]
    async fn test_volume_pass_continues_past_failures() {
        let fx = Fixture::new();
        fx.stub("attention", "a.james", Edition::Adult);
        fx.stub("memory", "a.bartlett", Edition::Adult);
        let dir = fx.root.join("editions/adult/volumes/volume-01-mind/entries");
        std::fs::write(dir.join("orphan.adoc"), "=== Orphan\n").unwrap();
        // attention fails, memory succeeds, orphan is skipped
        let backend = ScriptedBackend::new("Fine.").then_status(500);

        let tally = fx
            .generator(&backend)
            .draft_volume("volume-01-mind", Edition::Adult, None)
            .await
            .unwrap();

        assert_eq!(tally, RunTally { succeeded: 1, failed: 1, skipped: 1 });
        let memory = std::fs::read_to_string(dir.join("memory.adoc")).unwrap();
        assert!(memory.contains("====\nFine.\n===="));
    }

    #[tokio::test]
    async fn test_volume_pass_filters_by_entry() {
        let fx = Fixture::new();
        fx.stub("attention", "a.james", Edition::Children);
        fx.stub("memory", "a.bartlett", Edition::Children);
        let backend = ScriptedBackend::default();

        let tally = fx
            .generator(&backend)
            .draft_volume("volume-01-mind", Edition::Children, Some("memory"))
            .await
            .unwrap();

        assert_eq!(tally.succeeded, 1);
        assert_eq!(backend.requests()[0].faculty_id, "a.bartlett");
        assert!(backend.requests()[0].message.contains("CHILDREN'S EDITION"));
    }

    #[tokio::test]
    async fn test_volume_pass_without_files_is_empty() {
        let fx = Fixture::new();
        let backend = ScriptedBackend::default();

        let tally = fx
            .generator(&backend)
            .draft_volume("volume-01-mind", Edition::Adult, None)
            .await
            .unwrap();

        assert_eq!(tally, RunTally::default());
        assert_eq!(backend.call_count(), 0);
    }
}
