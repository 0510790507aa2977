//! Stitch generated text into an entry: canonical replacement and marginalia insertion.

use serde::Serialize;

use encyc_utils::error::PatchError;
use encyc_utils::types::MarginaliaKind;

use crate::document::Document;

/// One reviewer note to render as a marginalia block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarginaliaNote {
    pub kind: MarginaliaKind,
    pub author: String,
    pub text: String,
}

/// Replace the canonical block body with `body` (trimmed).
///
/// The placeholder block wins; otherwise the first canonical block is
/// overwritten. No canonical block at all is [`PatchError::PatternNotFound`].
pub fn patch_canonical(text: &str, body: &str) -> Result<String, PatchError> {
    let doc = Document::parse(text);
    let block = doc
        .placeholder_block()
        .or_else(|| doc.canonical_blocks().first().copied())
        .ok_or(PatchError::PatternNotFound)?;

    let replacement = format!("[role=canonical]\n====\n{}\n====", body.trim());
    Ok(doc.replace_span(block.start, block.end, &replacement))
}

/// Whitespace-delimited word count of the trimmed note.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Render one marginalia block, without a trailing newline.
#[must_use]
pub fn render_marginalia(note: &MarginaliaNote, entry_slug: &str, year: i32) -> String {
    let body = note.text.trim();
    format!(
        "[role=marginalia,\n type={},\n author=\"{}\",\n status=\"adjunct\",\n year=\"{year}\",\n length=\"{}\",\n targets=\"entry:{entry_slug}\",\n scope=\"local\"]\n====\n{body}\n====",
        note.kind,
        note.author,
        word_count(body),
    )
}

/// Insert rendered notes before the first existing marginalia block, or
/// append them at the end of the file when there is none.
///
/// Notes with blank text are dropped. New blocks keep their given order and
/// existing marginalia are never modified.
#[must_use]
pub fn append_marginalia(
    text: &str,
    entry_slug: &str,
    notes: &[MarginaliaNote],
    year: i32,
) -> String {
    let blocks: Vec<String> = notes
        .iter()
        .filter(|n| !n.text.trim().is_empty())
        .map(|n| render_marginalia(n, entry_slug, year))
        .collect();
    if blocks.is_empty() {
        return text.to_string();
    }
    let rendered = blocks.join("\n\n");

    let doc = Document::parse(text);
    match doc.marginalia_blocks().first() {
        Some(first) => doc.replace_span(first.start, first.start, &format!("{rendered}\n\n")),
        None => {
            let mut out = text.to_string();
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
            out.push_str(&rendered);
            out.push('\n');
            out
        }
    }
}
