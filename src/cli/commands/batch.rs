//! Batch command implementation
//!
//! Handles `encyc batch`: review every pending entry, publishing after each
//! volume edition.

use anyhow::Result;

use encyc_config::{Config, Registry};
use encyc_engine::batch::BatchDriver;
use encyc_engine::publish::Publisher;
use encyc_utils::error::{EncycError, ValidationError};
use encyc_utils::types::EditionSelection;

use super::common::Services;

pub async fn execute_batch_command(
    volume: Option<u32>,
    selection: EditionSelection,
    config: &Config,
    registry: &Registry,
) -> Result<()> {
    if let Some(number) = volume
        && registry.volume(number).is_none()
    {
        return Err(EncycError::from(ValidationError::UnknownVolume(number)).into());
    }

    let services = Services::from_config(config)?;
    let publisher = Publisher::new(&config.paths.content_root, &config.publish);
    let driver = BatchDriver::new(services.context(config, registry), &publisher);

    let report = driver.run(volume, selection).await?;

    for run in &report.runs {
        let published = run
            .published
            .map_or_else(|| "not published".to_string(), |p| p.to_string());
        println!(
            "✓ Volume {} ({}): {} generated, {} failed [{published}]",
            run.volume, run.edition, run.tally.succeeded, run.tally.failed
        );
    }
    println!(
        "All volumes processed: {} generated, {} failed",
        report.total.succeeded, report.total.failed
    );
    Ok(())
}
