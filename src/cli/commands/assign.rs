//! Assign command implementation
//!
//! Handles `encyc assign`: materialize the registry's topic assignments.

use anyhow::Result;

use encyc_config::{Config, Registry};
use encyc_engine::assignments::apply_assignments;
use encyc_utils::error::{EncycError, ValidationError};

pub fn execute_assign_command(
    volume: Option<u32>,
    dry_run: bool,
    config: &Config,
    registry: &Registry,
) -> Result<()> {
    if let Some(number) = volume
        && registry.volume(number).is_none()
    {
        return Err(EncycError::from(ValidationError::UnknownVolume(number)).into());
    }

    let report = apply_assignments(registry, &config.paths.content_root, volume, dry_run)?;

    let prefix = if dry_run { "Would create" } else { "Created" };
    println!(
        "✓ {prefix} {}, updated {}, unchanged {} ({} entries under {})",
        report.created,
        report.updated,
        report.unchanged,
        report.total(),
        config.paths.content_root
    );
    if dry_run {
        println!("  Dry run: no files were written");
    }
    Ok(())
}
