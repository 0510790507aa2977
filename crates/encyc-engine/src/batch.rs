//! Batch generation with review across volumes and editions.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{error, info, warn};

use encyc_config::Volume;
use encyc_entry::EntryMetadata;
use encyc_utils::types::{Edition, EditionSelection};

use crate::context::{PipelineContext, RunTally, entry_files, pause};
use crate::publish::{PublishOutcome, Publisher};
use crate::workflow::{ReviewRequest, ReviewWorkflow};

/// Outcome for one volume edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditionRun {
    pub volume: u32,
    pub volume_slug: String,
    pub edition: Edition,
    pub tally: RunTally,
    /// `None` when nothing was generated and publishing was not attempted.
    pub published: Option<PublishOutcome>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub runs: Vec<EditionRun>,
    pub total: RunTally,
}

pub struct BatchDriver<'a> {
    ctx: PipelineContext<'a>,
    workflow: ReviewWorkflow<'a>,
    publisher: &'a Publisher,
}

impl<'a> BatchDriver<'a> {
    #[must_use]
    pub fn new(ctx: PipelineContext<'a>, publisher: &'a Publisher) -> Self {
        Self {
            ctx,
            workflow: ReviewWorkflow::new(ctx),
            publisher,
        }
    }

    /// Replace the workflow, e.g. one with a fixed reviewer seed.
    #[must_use]
    pub fn with_workflow(mut self, workflow: ReviewWorkflow<'a>) -> Self {
        self.workflow = workflow;
        self
    }

    /// Entries of a volume edition still awaiting canonical text, by file name.
    ///
    /// # Errors
    ///
    /// Fails when the entries directory cannot be listed. Unreadable files
    /// are logged and left out.
    pub fn pending_entries(&self, volume_slug: &str, edition: Edition) -> Result<Vec<EntryMetadata>> {
        let dir = self.ctx.entries_dir(volume_slug, edition);
        Ok(entry_files(&dir)?
            .iter()
            .filter_map(|path| {
                EntryMetadata::read(path, edition)
                    .inspect_err(|e| warn!(path = %path, error = %format!("{e:#}"), "Skipping unreadable entry"))
                    .ok()
            })
            .filter(EntryMetadata::is_pending)
            .collect())
    }

    /// Run the review workflow over every pending entry of the selected
    /// volumes and editions, publishing after each volume edition.
    ///
    /// # Errors
    ///
    /// Fails on an unknown volume number or an unlistable entries directory.
    /// Individual entry failures are counted, not returned.
    pub async fn run(&self, volume: Option<u32>, selection: EditionSelection) -> Result<BatchReport> {
        let registry = self.ctx.registry;
        let volumes: Vec<&Volume> = match volume {
            Some(number) => vec![
                registry
                    .volume(number)
                    .with_context(|| format!("Unknown volume number: {number}"))?,
            ],
            None => registry.volumes().iter().collect(),
        };
        let editions = selection.editions();

        let mut report = BatchReport::default();
        let mut first = true;
        for vol in volumes {
            info!(volume = vol.number, title = %vol.title, "Processing volume");
            for &edition in &editions {
                if !first {
                    pause(self.ctx.pacing.edition_delay()).await;
                }
                first = false;

                let run = self.run_edition(vol, edition).await?;
                report.total.absorb(run.tally);
                report.runs.push(run);
            }
        }

        info!(
            succeeded = report.total.succeeded,
            failed = report.total.failed,
            "All volumes processed"
        );
        Ok(report)
    }

    async fn run_edition(&self, vol: &Volume, edition: Edition) -> Result<EditionRun> {
        let entries = self.pending_entries(&vol.slug, edition)?;
        info!(volume = %vol.slug, edition = %edition, pending = entries.len(), "Found entries to generate");

        let mut tally = RunTally::default();
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                pause(self.ctx.pacing.entry_delay()).await;
            }
            // is_pending guarantees the faculty id
            let Some(faculty_id) = entry.faculty_id.clone() else {
                tally.skipped += 1;
                continue;
            };
            let request = ReviewRequest {
                volume_slug: vol.slug.clone(),
                edition,
                entry_slug: entry.slug.clone(),
                faculty_id,
                entry_type: Some(entry.entry_type),
                reviewers: None,
            };
            match self.workflow.run(&request).await {
                Ok(_) => tally.succeeded += 1,
                Err(e) => {
                    error!(slug = %entry.slug, stage = %e.stage(), error = %e, "Entry failed");
                    tally.failed += 1;
                }
            }
        }

        info!(
            volume = vol.number,
            edition = %edition,
            succeeded = tally.succeeded,
            failed = tally.failed,
            "Volume edition complete"
        );

        let published = if tally.succeeded > 0 {
            Some(self.publisher.publish(vol.number, edition).await)
        } else {
            None
        };

        Ok(EditionRun {
            volume: vol.number,
            volume_slug: vol.slug.clone(),
            edition,
            tally,
            published,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use encyc_config::{GenerationConfig, PacingConfig, PublishConfig, Registry};
    use encyc_entry::{ensure_entry, resolve};
    use encyc_llm::test_support::{FixedEvaluator, ScriptedBackend};
    use tempfile::TempDir;

    const REGISTRY: &str = r#"
[[volumes]]
number = 1
slug = "volume-01-mind"
numeral = "I"
title = "Mind"

[[volumes.topics]]
slug = "attention"
authors = ["a.james"]

[[volumes.topics]]
slug = "memory"
authors = ["a.bartlett"]

[reviewers]
pool = ["a.simon", "a.weil", "a.dewey"]

[authors]
"a.james" = "William James"
"#;

    struct Fixture {
        _dir: TempDir,
        root: Utf8PathBuf,
        registry: Registry,
        generation: GenerationConfig,
        pacing: PacingConfig,
        evaluator: FixedEvaluator,
        publisher: Publisher,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
            let publish = PublishConfig {
                enabled: false,
                ..PublishConfig::default()
            };
            Self {
                publisher: Publisher::new(&root, &publish),
                _dir: dir,
                root,
                registry: Registry::from_toml_str(REGISTRY).unwrap(),
                generation: GenerationConfig::default(),
                pacing: PacingConfig::none(),
                evaluator: FixedEvaluator::default(),
            }
        }

        fn driver<'a>(&'a self, backend: &'a ScriptedBackend) -> BatchDriver<'a> {
            let ctx = PipelineContext {
                registry: &self.registry,
                backend,
                evaluator: &self.evaluator,
                generation: &self.generation,
                pacing: &self.pacing,
                content_root: &self.root,
            };
            BatchDriver::new(ctx, &self.publisher).with_workflow(ReviewWorkflow::new(ctx).with_seed(5))
        }

        fn stub(&self, topic: &str, author: &str, edition: Edition) -> Utf8PathBuf {
            let target = resolve(&self.root, "volume-01-mind", edition, topic, author, 0);
            ensure_entry(&target, author, &self.registry.author_name(author), false).unwrap();
            target.path
        }
    }

    #[test]
    fn test_pending_requires_assignment_and_placeholder() {
        let fx = Fixture::new();
        let attention = fx.stub("attention", "a.james", Edition::Adult);
        fx.stub("memory", "a.bartlett", Edition::Adult);
        let dir = attention.parent().unwrap();
        std::fs::write(dir.join("unassigned.adoc"), "=== Unassigned\n[role=canonical]\n====\n[CANONICAL TEXT TO BE GENERATED]\n====\n").unwrap();
        std::fs::write(dir.join("done.adoc"), "=== Done\n:faculty-id: a.james\n:canonical-author: William James\n[role=canonical]\n====\nWritten.\n====\n").unwrap();

        let backend = ScriptedBackend::default();
        let pending = fx.driver(&backend).pending_entries("volume-01-mind", Edition::Adult).unwrap();

        let slugs: Vec<&str> = pending.iter().map(|m| m.slug.as_str()).collect();
        assert_eq!(slugs, vec!["attention", "memory"]);
    }

    #[tokio::test]
    async fn test_batch_continues_after_failing_entry() {
        let fx = Fixture::new();
        fx.stub("attention", "a.james", Edition::Adult);
        let memory = fx.stub("memory", "a.bartlett", Edition::Adult);
        // attention's draft fails; memory gets six fallback answers
        let backend = ScriptedBackend::new("Generated text.").then_status(502);

        let report = fx
            .driver(&backend)
            .run(Some(1), EditionSelection::Adult)
            .await
            .unwrap();

        assert_eq!(report.total, RunTally { succeeded: 1, failed: 1, skipped: 0 });
        assert_eq!(report.runs.len(), 1);
        assert_eq!(report.runs[0].published, Some(PublishOutcome::Disabled));
        assert_eq!(backend.call_count(), 7);
        let text = std::fs::read_to_string(memory).unwrap();
        assert!(!text.contains("[CANONICAL TEXT TO BE GENERATED]"));
    }

    #[tokio::test]
    async fn test_both_editions_are_visited() {
        let fx = Fixture::new();
        fx.stub("attention", "a.james", Edition::Children);
        let backend = ScriptedBackend::default();

        let report = fx
            .driver(&backend)
            .run(None, EditionSelection::Both)
            .await
            .unwrap();

        let editions: Vec<Edition> = report.runs.iter().map(|r| r.edition).collect();
        assert_eq!(editions, vec![Edition::Adult, Edition::Children]);
        assert_eq!(report.runs[0].published, None);
        assert_eq!(report.runs[1].tally.succeeded, 1);
    }

    #[tokio::test]
    async fn test_second_batch_finds_nothing_pending() {
        let fx = Fixture::new();
        fx.stub("attention", "a.james", Edition::Adult);
        let backend = ScriptedBackend::default();
        let driver = fx.driver(&backend);

        driver.run(Some(1), EditionSelection::Adult).await.unwrap();
        let again = driver.run(Some(1), EditionSelection::Adult).await.unwrap();

        assert_eq!(again.total.attempted(), 0);
        assert_eq!(backend.call_count(), 6);
    }

    #[tokio::test]
    async fn test_unknown_volume() {
        let fx = Fixture::new();
        let backend = ScriptedBackend::default();
        let err = fx
            .driver(&backend)
            .run(Some(4), EditionSelection::Both)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unknown volume number: 4"));
    }
}
