//! Entry table rows for the site, one per (topic, author).

use anyhow::{Context, Result};
use serde::Serialize;

use encyc_config::{Registry, Volume};
use encyc_entry::{entry_slug, title_from_slug};
use encyc_utils::types::EntryType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogRow {
    pub slug: String,
    pub title: String,
    pub author: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
}

/// Rows for one topic, in author order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogSection {
    pub volume: String,
    pub topic: String,
    pub entries: Vec<CatalogRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum CatalogFormat {
    Json,
    Ts,
}

/// Catalog of every topic in one volume, or in all of them.
///
/// Every row is typed `major`: each perspective is a full entry.
///
/// # Errors
///
/// Fails on an unknown volume number.
pub fn build_catalog(registry: &Registry, volume: Option<u32>) -> Result<Vec<CatalogSection>> {
    let volumes: Vec<&Volume> = match volume {
        Some(number) => vec![
            registry
                .volume(number)
                .with_context(|| format!("Unknown volume number: {number}"))?,
        ],
        None => registry.volumes().iter().collect(),
    };

    Ok(volumes
        .into_iter()
        .flat_map(|vol| {
            vol.topics.iter().map(|topic| CatalogSection {
                volume: vol.slug.clone(),
                topic: topic.slug.clone(),
                entries: topic
                    .authors
                    .iter()
                    .enumerate()
                    .map(|(index, author_id)| CatalogRow {
                        slug: entry_slug(&topic.slug, author_id, index),
                        title: title_from_slug(&topic.slug),
                        author: registry.author_name(author_id),
                        entry_type: EntryType::Major,
                    })
                    .collect(),
            })
        })
        .collect())
}

/// Render sections in the requested format.
///
/// # Errors
///
/// Fails only if JSON serialization fails.
pub fn render(sections: &[CatalogSection], format: CatalogFormat) -> Result<String> {
    match format {
        CatalogFormat::Json => {
            serde_json::to_string_pretty(sections).context("Failed to serialize catalog")
        }
        CatalogFormat::Ts => Ok(render_typescript(sections)),
    }
}

/// Object literals ready to paste into the site's `volumes.ts`, grouped by
/// volume and topic comments.
#[must_use]
pub fn render_typescript(sections: &[CatalogSection]) -> String {
    let mut out = String::from("// Generated entry objects for multi-perspective topics:\n");
    let mut current_volume: Option<&str> = None;

    for section in sections {
        if current_volume != Some(section.volume.as_str()) {
            out.push_str(&format!("\n// {}:\n", section.volume));
            current_volume = Some(&section.volume);
        }
        out.push_str(&format!("\n// {}:\n", section.topic));
        let rows: Vec<String> = section
            .entries
            .iter()
            .map(|row| {
                format!(
                    "    {{ slug: '{}', title: '{}', author: '{}', type: '{}' }}",
                    ts_escape(&row.slug),
                    ts_escape(&row.title),
                    ts_escape(&row.author),
                    row.entry_type
                )
            })
            .collect();
        out.push_str(&rows.join(",\n"));
        out.push('\n');
    }
    out
}

fn ts_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
