//! Generate command implementations
//!
//! Handles `encyc generate` (one entry) and `encyc generate-volume`
//! (every assigned entry of a volume), both without review.

use anyhow::Result;

use encyc_config::{Config, Registry};
use encyc_engine::draft::{DraftGenerator, DraftOutcome, DraftRequest};
use encyc_engine::{RunTally, pause};
use encyc_utils::types::{Edition, EditionSelection, EntryType};

use super::common::{Services, volume_slug, workflow_failure};

pub async fn execute_generate_command(
    entry: &str,
    faculty: &str,
    edition: Edition,
    volume: u32,
    entry_type: Option<EntryType>,
    config: &Config,
    registry: &Registry,
) -> Result<()> {
    let volume_slug = volume_slug(registry, volume)?;
    let services = Services::from_config(config)?;
    let generator = DraftGenerator::new(services.context(config, registry));

    let request = DraftRequest {
        volume_slug,
        edition,
        entry_slug: entry.to_string(),
        faculty_id: faculty.to_string(),
        entry_type,
    };

    match generator.draft_entry(&request).await.map_err(workflow_failure)? {
        DraftOutcome::Patched { path, words } => {
            println!("✓ Wrote {words} words to {path}");
        }
        DraftOutcome::Unsaved { text } => {
            eprintln!("No entry file for {entry} ({edition}), printing the generated text");
            println!("{text}");
        }
        DraftOutcome::NoCanonicalBlock { path, text } => {
            eprintln!("⚠ No canonical block in {path}, printing the generated text");
            println!("{text}");
        }
    }
    Ok(())
}

pub async fn execute_generate_volume_command(
    volume: u32,
    selection: EditionSelection,
    entry: Option<&str>,
    config: &Config,
    registry: &Registry,
) -> Result<()> {
    let volume_slug = volume_slug(registry, volume)?;
    let services = Services::from_config(config)?;
    let generator = DraftGenerator::new(services.context(config, registry));

    let mut total = RunTally::default();
    for (i, edition) in selection.editions().into_iter().enumerate() {
        if i > 0 {
            pause(config.pacing.edition_delay()).await;
        }
        let tally = generator.draft_volume(&volume_slug, edition, entry).await?;
        println!(
            "✓ {volume_slug} ({edition}): {} generated, {} failed, {} skipped",
            tally.succeeded, tally.failed, tally.skipped
        );
        total.absorb(tally);
    }

    if total.failed > 0 {
        println!("  {} entries failed; see the log above", total.failed);
    }
    Ok(())
}
