//! Create entry stubs and keep their faculty fields in step with the registry.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use encyc_utils::atomic_write::write_file_atomic;

use crate::document::Document;
use crate::resolver::EntryTarget;

/// What [`ensure_entry`] did (or would do, in a dry run).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnsureOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Title-case a slug on hyphens: `mind-body` → `Mind Body`.
#[must_use]
pub fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Full stub for a new entry file.
#[must_use]
pub fn render_stub(target: &EntryTarget, author_id: &str, author_name: &str) -> String {
    let slug = &target.slug;
    format!(
        "// Entry: {slug} ({volume})
// Canonical Author: {author_name}
// Type: Major Entry
// Faculty ID: {author_id}

[[entry-{slug}]]
=== {title}
:canonical-author: {author_name}
:faculty-id: {author_id}
:status: canonical
:entry-type: major
:length-target: 8–12 pages
:word-target: 4000–6000

[role=canonical]
====
[CANONICAL TEXT TO BE GENERATED]
====

[role=marginalia,
 type=objection,
 author=\"Reviewer\",
 status=\"adjunct\",
 year=\"2026\",
 length=\"42\",
 targets=\"entry:{slug}\",
 scope=\"local\"]
====
[MARGINALIA TO BE GENERATED]
====
",
        volume = target.volume_slug,
        title = title_from_slug(slug),
    )
}

/// Set `:faculty-id:` and `:canonical-author:` in existing entry text.
///
/// A present field has its line replaced. An absent `faculty-id` goes right
/// after the `=== ` title line; an absent `canonical-author` goes right after
/// the `faculty-id` line. Without an anchor line the field is left out.
#[must_use]
pub fn apply_assignment(text: &str, author_id: &str, author_name: &str) -> String {
    let with_id = set_field(text, "faculty-id", author_id, |doc| doc.title_line());
    set_field(&with_id, "canonical-author", author_name, |doc| {
        doc.field("faculty-id").map(|f| f.line_index)
    })
}

fn set_field<F>(text: &str, name: &str, value: &str, anchor: F) -> String
where
    F: Fn(&Document<'_>) -> Option<usize>,
{
    let doc = Document::parse(text);
    let line = format!(":{name}: {value}");
    if let Some(field) = doc.field(name) {
        return doc.replace_line(field.line_index, &line);
    }
    match anchor(&doc) {
        Some(idx) => doc.insert_line_after(idx, &line),
        None => {
            debug!(field = name, "No anchor line for field, leaving entry as is");
            text.to_string()
        }
    }
}

/// Make sure the entry file exists and carries the given author.
///
/// Missing files are created from [`render_stub`]. Existing files are patched
/// with [`apply_assignment`] and only written when the text changed. In a dry
/// run nothing is written and the would-be action is logged.
pub fn ensure_entry(
    target: &EntryTarget,
    author_id: &str,
    author_name: &str,
    dry_run: bool,
) -> Result<EnsureOutcome> {
    let path = &target.path;

    if !path.exists() {
        if dry_run {
            info!(path = %path, "Would create");
        } else {
            write_file_atomic(path, &render_stub(target, author_id, author_name))
                .with_context(|| format!("Failed to create entry stub: {path}"))?;
            info!(path = %path, faculty_id = %author_id, "Created");
        }
        return Ok(EnsureOutcome::Created);
    }

    let current = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read entry file: {path}"))?;
    let updated = apply_assignment(&current, author_id, author_name);
    if updated == current {
        debug!(path = %path, "Unchanged");
        return Ok(EnsureOutcome::Unchanged);
    }

    if dry_run {
        info!(path = %path, "Would update");
    } else {
        write_file_atomic(path, &updated)
            .with_context(|| format!("Failed to update entry file: {path}"))?;
        info!(path = %path, faculty_id = %author_id, "Updated");
    }
    Ok(EnsureOutcome::Updated)
}
