//! Catalog command implementation
//!
//! Handles `encyc catalog`: print entry table rows for the site.

use anyhow::Result;

use encyc_config::Registry;
use encyc_engine::catalog::{CatalogFormat, build_catalog, render};
use encyc_utils::error::{EncycError, ValidationError};

pub fn execute_catalog_command(
    volume: Option<u32>,
    format: CatalogFormat,
    registry: &Registry,
) -> Result<()> {
    if let Some(number) = volume
        && registry.volume(number).is_none()
    {
        return Err(EncycError::from(ValidationError::UnknownVolume(number)).into());
    }

    let sections = build_catalog(registry, volume)?;
    print!("{}", render(&sections, format)?);
    if format == CatalogFormat::Json {
        println!();
    }
    Ok(())
}
