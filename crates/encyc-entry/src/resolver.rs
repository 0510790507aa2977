//! Canonical location and slug of an entry file.
//!
//! `{content_root}/editions/{edition}/volumes/{volume}/entries/{slug}.adoc`

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use encyc_utils::types::Edition;

/// Where one (topic, author) entry lives for one edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryTarget {
    pub path: Utf8PathBuf,
    pub slug: String,
    pub volume_slug: String,
    pub edition: Edition,
}

/// Author id without the `a.` prefix, `.` and `_` turned into `-`.
#[must_use]
pub fn author_suffix(author_id: &str) -> String {
    author_id
        .strip_prefix("a.")
        .unwrap_or(author_id)
        .replace(['.', '_'], "-")
}

/// Index 0 keeps the topic slug; later authors get `topic-{suffix}`.
#[must_use]
pub fn entry_slug(topic_slug: &str, author_id: &str, index: usize) -> String {
    if index == 0 {
        topic_slug.to_string()
    } else {
        format!("{topic_slug}-{}", author_suffix(author_id))
    }
}

/// Directory holding every entry file of one volume and edition.
#[must_use]
pub fn entries_dir(content_root: &Utf8Path, volume_slug: &str, edition: Edition) -> Utf8PathBuf {
    content_root
        .join("editions")
        .join(edition.to_string())
        .join("volumes")
        .join(volume_slug)
        .join("entries")
}

#[must_use]
pub fn entry_path(
    content_root: &Utf8Path,
    volume_slug: &str,
    edition: Edition,
    slug: &str,
) -> Utf8PathBuf {
    entries_dir(content_root, volume_slug, edition).join(format!("{slug}.adoc"))
}

/// Resolve the entry for the `index`-th author of a topic.
#[must_use]
pub fn resolve(
    content_root: &Utf8Path,
    volume_slug: &str,
    edition: Edition,
    topic_slug: &str,
    author_id: &str,
    index: usize,
) -> EntryTarget {
    let slug = entry_slug(topic_slug, author_id, index);
    EntryTarget {
        path: entry_path(content_root, volume_slug, edition, &slug),
        slug,
        volume_slug: volume_slug.to_string(),
        edition,
    }
}
