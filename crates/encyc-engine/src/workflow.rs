//! Generation with peer review.
//!
//! One run takes an entry through eight strictly sequential stages:
//!
//! 1. draft as the primary author
//! 2. fidelity check of the draft
//! 3. reviewer selection
//! 4. peer review, one reviewer at a time
//! 5. revision as the primary author
//! 6. fidelity check of the revision
//! 7. marginalia, one reviewer at a time, each fidelity-checked
//! 8. persistence into the entry file
//!
//! Evaluator trouble never stops a run. A generation failure at stage 1, 4, 5
//! or 7 aborts the run for that entry and surfaces as [`WorkflowError`].

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Datelike;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use thiserror::Error;
use tracing::{Instrument, info, warn};

use encyc_entry::{
    EntryMetadata, MarginaliaNote, append_marginalia, entry_path, entry_slug, patch_canonical,
    title_from_slug, word_count,
};
use encyc_llm::{FidelityReport, LlmError};
use encyc_prompt::{
    EntryPromptSpec, FidelityPromptSpec, build_entry_prompt, build_marginalia_prompt,
    build_review_prompt, build_revision_prompt, max_tokens,
};
use encyc_utils::atomic_write::write_file_atomic;
use encyc_utils::error::PatchError;
use encyc_utils::logging::{entry_span, log_stage_degraded, log_stage_start, stage_span};
use encyc_utils::types::{Edition, EntryType, GenerationMode, MarginaliaKind};

use crate::context::{PipelineContext, pause};
use crate::reviewers::{SelectionSource, select_reviewers};

/// Workflow stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Draft,
    DraftFidelity,
    ReviewerSelection,
    PeerReview,
    Revision,
    RevisionFidelity,
    Marginalia,
    Persistence,
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{stage} stage failed for {slug}: {source}")]
    Generation {
        slug: String,
        stage: Stage,
        #[source]
        source: LlmError,
    },

    #[error("Failed to write {path}: {reason}")]
    Persistence { path: Utf8PathBuf, reason: String },
}

impl WorkflowError {
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::Generation { stage, .. } => *stage,
            Self::Persistence { .. } => Stage::Persistence,
        }
    }
}

/// What to review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRequest {
    pub volume_slug: String,
    pub edition: Edition,
    pub entry_slug: String,
    pub faculty_id: String,
    /// Overrides the entry file's `:entry-type:`.
    pub entry_type: Option<EntryType>,
    /// Explicit reviewers, used when they still name two once the author is dropped.
    pub reviewers: Option<Vec<String>>,
}

/// One reviewer's contribution. Kept for the report only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRecord {
    pub reviewer_id: String,
    pub feedback: String,
    pub marginalia: Option<String>,
    pub kind: Option<MarginaliaKind>,
    pub marginalia_fidelity: Option<FidelityReport>,
}

/// How stage 8 ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Persisted {
    Written { path: Utf8PathBuf },
    MissingFile { path: Utf8PathBuf },
    NoCanonicalBlock { path: Utf8PathBuf },
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowReport {
    pub slug: String,
    pub faculty_id: String,
    pub edition: Edition,
    pub draft_words: usize,
    pub revised_words: usize,
    pub draft_fidelity: FidelityReport,
    pub revision_fidelity: FidelityReport,
    pub reviewer_source: SelectionSource,
    pub reviews: Vec<ReviewRecord>,
    pub persisted: Persisted,
}

/// Runs the eight stages for one entry, and multi-perspective sets of entries.
pub struct ReviewWorkflow<'a> {
    ctx: PipelineContext<'a>,
    seed: Option<u64>,
    year: i32,
}

impl<'a> ReviewWorkflow<'a> {
    #[must_use]
    pub fn new(ctx: PipelineContext<'a>) -> Self {
        Self {
            ctx,
            seed: None,
            year: chrono::Local::now().year(),
        }
    }

    /// Fixed seed for the random reviewer draw.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Year stamped on new marginalia.
    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Run all eight stages for one entry.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Generation`] when a generation call fails and
    /// [`WorkflowError::Persistence`] when the patched file cannot be written.
    /// A missing entry file or canonical block is not an error; it is logged
    /// and reported in [`WorkflowReport::persisted`].
    pub async fn run(&self, request: &ReviewRequest) -> Result<WorkflowReport, WorkflowError> {
        let span = entry_span(
            &request.entry_slug,
            &request.edition.to_string(),
            &request.faculty_id,
        );
        self.run_stages(request).instrument(span).await
    }

    /// Primary entry, then one run per additional author against the
    /// suffixed slug, pausing between runs.
    ///
    /// Stops at the first failing run; runs already finished stay written.
    pub async fn run_multi_perspective(
        &self,
        request: &ReviewRequest,
        additional_authors: &[String],
    ) -> Result<Vec<WorkflowReport>, WorkflowError> {
        let mut reports = vec![self.run(request).await?];

        for (offset, author) in additional_authors.iter().enumerate() {
            pause(self.ctx.pacing.author_delay()).await;
            let alt = ReviewRequest {
                entry_slug: entry_slug(&request.entry_slug, author, offset + 1),
                faculty_id: author.clone(),
                ..request.clone()
            };
            info!(slug = %alt.entry_slug, faculty_id = %author, "Generating additional perspective");
            reports.push(self.run(&alt).await?);
        }

        Ok(reports)
    }

    async fn run_stages(&self, request: &ReviewRequest) -> Result<WorkflowReport, WorkflowError> {
        let ctx = &self.ctx;
        let slug = request.entry_slug.as_str();
        let faculty_id = request.faculty_id.as_str();
        let path = entry_path(ctx.content_root, &request.volume_slug, request.edition, slug);
        let author_name = ctx.registry.author_name(faculty_id);

        let metadata = if path.exists() {
            EntryMetadata::read(&path, request.edition)
                .inspect_err(|e| warn!(path = %path, error = %e, "Could not read entry metadata"))
                .ok()
        } else {
            None
        };
        let entry_type = request
            .entry_type
            .or_else(|| metadata.as_ref().map(|m| m.entry_type))
            .unwrap_or_default();
        let mut prompt_spec = metadata.as_ref().map_or_else(
            || EntryPromptSpec::new(title_from_slug(slug), request.edition, entry_type),
            EntryMetadata::prompt_spec,
        );
        prompt_spec.entry_type = entry_type;
        // stubs carry the adult range in :word-target:, the edition table decides here
        prompt_spec.word_target = None;
        let title = prompt_spec.title.clone();
        let author_budget = max_tokens(entry_type);

        info!(
            slug = slug,
            author = %author_name,
            entry_type = %entry_type,
            volume = %request.volume_slug,
            "Starting generation with review"
        );

        // 1. Draft
        let draft = self
            .stage(slug, Stage::Draft, async {
                ctx.generate(
                    faculty_id,
                    build_entry_prompt(&prompt_spec),
                    GenerationMode::Lecture,
                    author_budget,
                )
                .await
            })
            .await?;
        info!(slug = slug, words = word_count(&draft), "Draft generated");

        // 2. Fidelity of the draft
        let draft_fidelity = self
            .fidelity(slug, Stage::DraftFidelity, &draft, faculty_id, &author_name, "initial article generation")
            .await;

        // 3. Reviewer selection
        log_stage_start(slug, &Stage::ReviewerSelection.to_string());
        let (reviewers, reviewer_source) = {
            let policy = ctx.registry.reviewers();
            let explicit = request.reviewers.as_deref();
            match self.seed {
                Some(seed) => select_reviewers(
                    policy,
                    faculty_id,
                    slug,
                    explicit,
                    &mut StdRng::seed_from_u64(seed),
                ),
                None => select_reviewers(policy, faculty_id, slug, explicit, &mut rand::rng()),
            }
        };
        info!(slug = slug, reviewers = %reviewers.join(", "), source = %reviewer_source, "Reviewers selected");

        // 4. Peer review
        let mut reviews: Vec<ReviewRecord> = Vec::with_capacity(reviewers.len());
        for (i, reviewer_id) in reviewers.iter().enumerate() {
            if i > 0 {
                pause(ctx.pacing.review_delay()).await;
            }
            let prompt = build_review_prompt(reviewer_id, &draft, &title, &author_name);
            let feedback = self
                .stage(slug, Stage::PeerReview, async {
                    ctx.generate(reviewer_id, prompt, GenerationMode::OfficeHours, ctx.generation.max_tokens)
                        .await
                })
                .await?;
            info!(slug = slug, reviewer = %reviewer_id, "Review complete");
            reviews.push(ReviewRecord {
                reviewer_id: reviewer_id.clone(),
                feedback,
                marginalia: None,
                kind: None,
                marginalia_fidelity: None,
            });
        }

        // 5. Revision
        let feedback: Vec<String> = reviews.iter().map(|r| r.feedback.clone()).collect();
        let revised = self
            .stage(slug, Stage::Revision, async {
                ctx.generate(
                    faculty_id,
                    build_revision_prompt(faculty_id, &draft, &feedback, &title),
                    GenerationMode::Lecture,
                    author_budget,
                )
                .await
            })
            .await?;
        info!(slug = slug, words = word_count(&revised), "Revision generated");

        // 6. Fidelity of the revision
        let revision_fidelity = self
            .fidelity(slug, Stage::RevisionFidelity, &revised, faculty_id, &author_name, "revised article")
            .await;

        // 7. Marginalia
        for (i, review) in reviews.iter_mut().enumerate() {
            if i > 0 {
                pause(ctx.pacing.review_delay()).await;
            }
            let kind = ctx.registry.reviewers().kind_for(&review.reviewer_id);
            let reviewer_id = review.reviewer_id.clone();
            let prompt = build_marginalia_prompt(&reviewer_id, &revised, &title, kind);
            let note = self
                .stage(slug, Stage::Marginalia, async {
                    ctx.generate(&reviewer_id, prompt, GenerationMode::Polemic, ctx.generation.max_tokens)
                        .await
                })
                .await?;
            let reviewer_name = ctx.registry.author_name(&reviewer_id);
            let fidelity = self
                .fidelity(slug, Stage::Marginalia, &note, &reviewer_id, &reviewer_name, "marginalia")
                .await;
            info!(
                slug = slug,
                reviewer = %reviewer_id,
                kind = %kind,
                fidelity = fidelity.score,
                "Marginalia generated"
            );
            review.marginalia = Some(note);
            review.kind = Some(kind);
            review.marginalia_fidelity = Some(fidelity);
        }

        // 8. Persistence
        let persisted = self
            .persist(&path, slug, &revised, &reviews)
            .instrument(stage_span(&Stage::Persistence.to_string()))
            .await?;

        info!(slug = slug, "Workflow complete");
        Ok(WorkflowReport {
            slug: slug.to_string(),
            faculty_id: faculty_id.to_string(),
            edition: request.edition,
            draft_words: word_count(&draft),
            revised_words: word_count(&revised),
            draft_fidelity,
            revision_fidelity,
            reviewer_source,
            reviews,
            persisted,
        })
    }

    /// Run one generation stage inside its span, tagging failures with the stage.
    async fn stage<F>(&self, slug: &str, stage: Stage, call: F) -> Result<String, WorkflowError>
    where
        F: Future<Output = Result<String, LlmError>>,
    {
        let name = stage.to_string();
        log_stage_start(slug, &name);
        call.instrument(stage_span(&name))
            .await
            .map_err(|source| WorkflowError::Generation {
                slug: slug.to_string(),
                stage,
                source,
            })
    }

    async fn fidelity(
        &self,
        slug: &str,
        stage: Stage,
        text: &str,
        faculty_id: &str,
        faculty_name: &str,
        context: &str,
    ) -> FidelityReport {
        let spec = FidelityPromptSpec {
            text,
            faculty_id,
            faculty_name,
            context,
        };
        let report = self
            .ctx
            .evaluator
            .evaluate(&spec)
            .instrument(stage_span(&stage.to_string()))
            .await;

        info!(slug = slug, stage = %stage, score = report.score, "Voice fidelity");
        if !report.passed {
            warn!(
                slug = slug,
                stage = %stage,
                issues = %report.issues.join(", "),
                suggestions = %report.suggestions.join(", "),
                "Voice fidelity below expectations"
            );
        }
        report
    }

    async fn persist(
        &self,
        path: &Utf8Path,
        slug: &str,
        revised: &str,
        reviews: &[ReviewRecord],
    ) -> Result<Persisted, WorkflowError> {
        log_stage_start(slug, &Stage::Persistence.to_string());

        if !path.exists() {
            log_stage_degraded(slug, "persistence", "entry file not found");
            warn!(path = %path, "Entry file not found, nothing written");
            return Ok(Persisted::MissingFile { path: path.to_path_buf() });
        }

        let current = std::fs::read_to_string(path).map_err(|e| WorkflowError::Persistence {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let patched = match patch_canonical(&current, revised) {
            Ok(text) => text,
            Err(PatchError::PatternNotFound) => {
                log_stage_degraded(slug, "persistence", "no canonical block");
                warn!(path = %path, "Could not find canonical block, nothing written");
                return Ok(Persisted::NoCanonicalBlock { path: path.to_path_buf() });
            }
        };

        let notes: Vec<MarginaliaNote> = reviews
            .iter()
            .filter_map(|r| {
                Some(MarginaliaNote {
                    kind: r.kind.unwrap_or(MarginaliaKind::Clarification),
                    author: r.reviewer_id.clone(),
                    text: r.marginalia.clone()?,
                })
            })
            .collect();
        let updated = append_marginalia(&patched, slug, &notes, self.year);

        write_file_atomic(path, &updated).map_err(|e| WorkflowError::Persistence {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        })?;
        info!(path = %path, marginalia = notes.len(), "Updated entry file");

        Ok(Persisted::Written { path: path.to_path_buf() })
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
            }
        }

        fn ctx<'a>(
            &'a self,
            backend: &'a ScriptedBackend,
            evaluator: &'a FixedEvaluator,
        ) -> PipelineContext<'a> {
            PipelineContext {
                registry: &self.registry,
                backend,
                evaluator,
                generation: &self.generation,
                pacing: &self.pacing,
                content_root: &self.root,
            }
        }

        fn stub(&self, slug_index: usize, author: &str) -> Utf8PathBuf {
            let target = resolve(&self.root, "volume-01-mind", Edition::Adult, "attention", author, slug_index);
            ensure_entry(&target, author, &self.registry.author_name(author), false).unwrap();
            target.path
        }
    }

    fn request(reviewers: Option<&[&str]>) -> ReviewRequest {
        ReviewRequest {
            volume_slug: "volume-01-mind".to_string(),
            edition: Edition::Adult,
            entry_slug: "attention".to_string(),
            faculty_id: "a.james".to_string(),
            entry_type: Some(EntryType::Major),
            reviewers: reviewers.map(|r| r.iter().map(|s| (*s).to_string()).collect()),
        }
    }

    fn scripted() -> ScriptedBackend {
        ScriptedBackend::new("unused")
            .then_text("Draft text.")
            .then_text("Simon's review.")
            .then_text("Weil's review.")
            .then_text("Revised canonical text.")
            .then_text("Simon's sharp objection note.")
            .then_text("Weil's quite heretical note.")
    }

    #[tokio::test]
    async fn test_full_run_patches_entry() {
        let fx = Fixture::new();
        let path = fx.stub(0, "a.james");
        let backend = scripted();
        let evaluator = FixedEvaluator::default();

        let report = ReviewWorkflow::new(fx.ctx(&backend, &evaluator))
            .with_year(2026)
            .run(&request(None))
            .await
            .unwrap();

        assert_eq!(backend.call_count(), 6);
        assert_eq!(report.reviewer_source, SelectionSource::TopicDefault);
        assert_eq!(report.persisted, Persisted::Written { path: path.clone() });

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[role=canonical]\n====\nRevised canonical text.\n====\n"));
        assert!(!text.contains("[CANONICAL TEXT TO BE GENERATED]"));
        let simon = text.find("author=\"a.simon\"").unwrap();
        let weil = text.find("author=\"a.weil\"").unwrap();
        let example = text.find("author=\"Reviewer\"").unwrap();
        assert!(simon < weil && weil < example);
        assert!(text.contains(" type=objection,\n author=\"a.simon\""));
        assert!(text.contains(" type=heretic,\n author=\"a.weil\""));
        assert!(text.contains("year=\"2026\",\n length=\"4\""));

        assert_eq!(
            evaluator.contexts(),
            vec!["initial article generation", "revised article", "marginalia", "marginalia"]
        );
    }

    #[tokio::test]
    async fn test_calls_use_expected_modes_and_budgets() {
        let fx = Fixture::new();
        fx.stub(0, "a.james");
        let backend = scripted();
        let evaluator = FixedEvaluator::default();

        ReviewWorkflow::new(fx.ctx(&backend, &evaluator))
            .run(&request(None))
            .await
            .unwrap();

        let calls: Vec<(String, GenerationMode, u32)> = backend
            .requests()
            .into_iter()
            .map(|r| (r.faculty_id, r.context, r.max_tokens))
            .collect();
        assert_eq!(
            calls,
            vec![
                ("a.james".to_string(), GenerationMode::Lecture, 8000),
                ("a.simon".to_string(), GenerationMode::OfficeHours, 4000),
                ("a.weil".to_string(), GenerationMode::OfficeHours, 4000),
                ("a.james".to_string(), GenerationMode::Lecture, 8000),
                ("a.simon".to_string(), GenerationMode::Polemic, 4000),
                ("a.weil".to_string(), GenerationMode::Polemic, 4000),
            ]
        );

        let revision_prompt = &backend.requests()[3].message;
        assert!(revision_prompt.contains("Reviewer 1: Simon's review.\n\nReviewer 2: Weil's review."));
    }

    #[tokio::test]
    async fn test_children_draft_uses_edition_word_target() {
        let fx = Fixture::new();
        let target = resolve(&fx.root, "volume-01-mind", Edition::Children, "attention", "a.james", 0);
        ensure_entry(&target, "a.james", "William James", false).unwrap();
        let backend = ScriptedBackend::default();
        let evaluator = FixedEvaluator::default();
        let mut req = request(None);
        req.edition = Edition::Children;
        req.entry_type = None;

        ReviewWorkflow::new(fx.ctx(&backend, &evaluator))
            .run(&req)
            .await
            .unwrap();

        let draft = &backend.requests()[0].message;
        assert!(draft.contains("CHILDREN'S EDITION"));
        assert!(draft.contains("Word target: 750-1500"));
        assert!(!draft.contains("4000–6000"));
    }

    #[tokio::test]
    async fn test_explicit_reviewers_are_used() {
        let fx = Fixture::new();
        fx.stub(0, "a.james");
        let backend = ScriptedBackend::default();
        let evaluator = FixedEvaluator::default();

        let report = ReviewWorkflow::new(fx.ctx(&backend, &evaluator))
            .run(&request(Some(&["a.dewey", "a.kant"])))
            .await
            .unwrap();

        let reviewers: Vec<&str> = report.reviews.iter().map(|r| r.reviewer_id.as_str()).collect();
        assert_eq!(reviewers, vec!["a.dewey", "a.kant"]);
        assert_eq!(report.reviews[0].kind, Some(MarginaliaKind::Extension));
        assert_eq!(report.reviews[1].kind, Some(MarginaliaKind::Clarification));
    }

    #[tokio::test]
    async fn test_review_failure_aborts_without_writing() {
        let fx = Fixture::new();
        let path = fx.stub(0, "a.james");
        let before = std::fs::read_to_string(&path).unwrap();
        let backend = ScriptedBackend::new("x").then_text("Draft.").then_status(500);
        let evaluator = FixedEvaluator::default();

        let err = ReviewWorkflow::new(fx.ctx(&backend, &evaluator))
            .run(&request(None))
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Stage::PeerReview);
        assert!(matches!(
            err,
            WorkflowError::Generation {
                source: LlmError::Upstream { status: 500, .. },
                ..
            }
        ));
        assert_eq!(backend.call_count(), 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_failing_fidelity_does_not_block() {
        let fx = Fixture::new();
        fx.stub(0, "a.james");
        let backend = scripted();
        let evaluator = FixedEvaluator::new(FidelityReport {
            passed: false,
            score: 20,
            issues: vec!["anachronism".to_string()],
            suggestions: Vec::new(),
        });

        let report = ReviewWorkflow::new(fx.ctx(&backend, &evaluator))
            .run(&request(None))
            .await
            .unwrap();

        assert_eq!(report.draft_fidelity.score, 20);
        assert!(matches!(report.persisted, Persisted::Written { .. }));
    }

    #[tokio::test]
    async fn test_missing_entry_file_completes_without_write() {
        let fx = Fixture::new();
        let backend = scripted();
        let evaluator = FixedEvaluator::default();

        let report = ReviewWorkflow::new(fx.ctx(&backend, &evaluator))
            .run(&request(None))
            .await
            .unwrap();

        assert!(matches!(report.persisted, Persisted::MissingFile { .. }));
        assert_eq!(backend.call_count(), 6);
        assert!(!fx.root.join("editions").exists());
    }

    #[tokio::test]
    async fn test_entry_without_canonical_block_is_skipped() {
        let fx = Fixture::new();
        let path = entry_path(&fx.root, "volume-01-mind", Edition::Adult, "attention");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "=== Attention\n:faculty-id: a.james\n").unwrap();
        let backend = scripted();
        let evaluator = FixedEvaluator::default();

        let report = ReviewWorkflow::new(fx.ctx(&backend, &evaluator))
            .run(&request(None))
            .await
            .unwrap();

        assert!(matches!(report.persisted, Persisted::NoCanonicalBlock { .. }));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "=== Attention\n:faculty-id: a.james\n"
        );
    }

    #[tokio::test]
    async fn test_multi_perspective_runs_suffixed_entries() {
        let fx = Fixture::new();
        let primary = fx.stub(0, "a.james");
        let secondary = fx.stub(1, "a.simon");
        let backend = ScriptedBackend::default();
        let evaluator = FixedEvaluator::default();

        let reports = ReviewWorkflow::new(fx.ctx(&backend, &evaluator))
            .with_seed(9)
            .run_multi_perspective(&request(None), &["a.simon".to_string()])
            .await
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].slug, "attention-simon");
        assert_eq!(reports[1].faculty_id, "a.simon");
        assert!(reports[1].reviews.iter().all(|r| r.reviewer_id != "a.simon"));
        assert_eq!(backend.call_count(), 12);
        for path in [primary, secondary] {
            let text = std::fs::read_to_string(path).unwrap();
            assert!(text.contains("====\nGenerated text.\n===="));
        }
    }
}
