//! Materialize the registry's topic assignments as entry files.

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::Serialize;
use tracing::{info, warn};

use encyc_config::{Registry, Volume};
use encyc_entry::{EnsureOutcome, ensure_entry, resolve};
use encyc_utils::types::Edition;

/// Counts of what one assignment pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssignmentReport {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl AssignmentReport {
    fn record(&mut self, outcome: EnsureOutcome) {
        match outcome {
            EnsureOutcome::Created => self.created += 1,
            EnsureOutcome::Updated => self.updated += 1,
            EnsureOutcome::Unchanged => self.unchanged += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.created + self.updated + self.unchanged
    }
}

/// Ensure every (topic, author) entry of the selected volumes exists in both
/// editions with the assigned author.
///
/// `volume` limits the pass to one volume number; `None` covers them all.
///
/// # Errors
///
/// Fails on an unknown volume number or the first file that cannot be
/// read or written.
pub fn apply_assignments(
    registry: &Registry,
    content_root: &Utf8Path,
    volume: Option<u32>,
    dry_run: bool,
) -> Result<AssignmentReport> {
    let volumes: Vec<&Volume> = match volume {
        Some(number) => vec![
            registry
                .volume(number)
                .with_context(|| format!("Unknown volume number: {number}"))?,
        ],
        None => registry.volumes().iter().collect(),
    };

    for unknown in registry.unknown_authors() {
        warn!(faculty_id = %unknown, "Assigned author has no directory entry, using fallback name");
    }

    let mut report = AssignmentReport::default();
    for vol in volumes {
        info!(volume = %vol.slug, topics = vol.topics.len(), "Applying assignments");
        for topic in &vol.topics {
            for (index, author_id) in topic.authors.iter().enumerate() {
                let author_name = registry.author_name(author_id);
                for edition in Edition::ALL {
                    let target =
                        resolve(content_root, &vol.slug, edition, &topic.slug, author_id, index);
                    let outcome = ensure_entry(&target, author_id, &author_name, dry_run)?;
                    report.record(outcome);
                }
            }
        }
    }

    info!(
        created = report.created,
        updated = report.updated,
        unchanged = report.unchanged,
        dry_run = dry_run,
        "Assignments applied"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    const REGISTRY: &str = r#"
[[volumes]]
number = 1
slug = "volume-01-mind"
numeral = "I"
title = "Mind"

[[volumes.topics]]
slug = "attention"
authors = ["a.james", "a.simon"]

[[volumes.topics]]
slug = "memory"
authors = ["a.bartlett"]

[[volumes]]
number = 2
slug = "volume-02-language-meaning"
numeral = "II"
title = "Language & Meaning"

[[volumes.topics]]
slug = "sign"
authors = ["a.de.saussure"]

[authors]
"a.james" = "William James"
"a.simon" = "Herbert A. Simon"
"a.bartlett" = "Frederic Bartlett"
"#;

    fn setup() -> (TempDir, Utf8PathBuf, Registry) {
        let dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, root, Registry::from_toml_str(REGISTRY).unwrap())
    }

    #[test]
    fn test_creates_every_entry_in_both_editions() {
        let (_dir, root, registry) = setup();

        let report = apply_assignments(&registry, &root, None, false).unwrap();

        assert_eq!(report.created, 8);
        assert_eq!(report.total(), 8);
        for edition in ["adult", "children"] {
            let entries = root.join("editions").join(edition).join("volumes");
            assert!(entries.join("volume-01-mind/entries/attention.adoc").exists());
            assert!(entries.join("volume-01-mind/entries/attention-simon.adoc").exists());
            assert!(entries.join("volume-01-mind/entries/memory.adoc").exists());
            assert!(entries.join("volume-02-language-meaning/entries/sign.adoc").exists());
        }
    }

    #[test]
    fn test_second_pass_is_unchanged() {
        let (_dir, root, registry) = setup();
        apply_assignments(&registry, &root, None, false).unwrap();

        let report = apply_assignments(&registry, &root, None, false).unwrap();

        assert_eq!(report, AssignmentReport { created: 0, updated: 0, unchanged: 8 });
    }

    #[test]
    fn test_single_volume_and_fallback_name() {
        let (_dir, root, registry) = setup();

        let report = apply_assignments(&registry, &root, Some(2), false).unwrap();

        assert_eq!(report.created, 2);
        let text = std::fs::read_to_string(
            root.join("editions/adult/volumes/volume-02-language-meaning/entries/sign.adoc"),
        )
        .unwrap();
        assert!(text.contains(":canonical-author: de.saussure\n"));
        assert!(!root.join("editions/adult/volumes/volume-01-mind").exists());
    }

    #[test]
    fn test_dry_run_counts_but_writes_nothing() {
        let (_dir, root, registry) = setup();

        let report = apply_assignments(&registry, &root, Some(1), true).unwrap();

        assert_eq!(report.created, 6);
        assert!(!root.join("editions").exists());
    }

    #[test]
    fn test_unknown_volume_is_an_error() {
        let (_dir, root, registry) = setup();
        let err = apply_assignments(&registry, &root, Some(13), false).unwrap_err();
        assert!(err.to_string().contains("Unknown volume number: 13"));
    }
}
