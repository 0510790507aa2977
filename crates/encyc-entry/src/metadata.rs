use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::Serialize;

use encyc_prompt::{EntryPromptSpec, word_target};
use encyc_utils::types::{Edition, EntryType};

use crate::document::Document;

/// What the pipeline needs to know about an existing entry file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryMetadata {
    pub slug: String,
    pub title: String,
    pub edition: Edition,
    pub faculty_id: Option<String>,
    pub canonical_author: Option<String>,
    pub entry_type: EntryType,
    /// From `:word-target:` when present, else the table value.
    pub word_target: String,
    pub topics: Vec<String>,
    pub has_placeholder: bool,
}

impl EntryMetadata {
    /// Read and parse an entry file. The slug is the file stem.
    pub fn read(path: &Utf8Path, edition: Edition) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read entry file: {path}"))?;
        let slug = path
            .file_stem()
            .with_context(|| format!("Entry path has no file name: {path}"))?;
        Ok(Self::parse(slug, &text, edition))
    }

    #[must_use]
    pub fn parse(slug: &str, text: &str, edition: Edition) -> Self {
        let doc = Document::parse(text);
        let entry_type = doc
            .field_value("entry-type")
            .map(EntryType::parse_lenient)
            .unwrap_or_default();
        let target = doc
            .field_value("word-target")
            .map_or_else(|| word_target(entry_type, edition).to_string(), str::to_string);

        Self {
            slug: slug.to_string(),
            title: doc.title().unwrap_or(slug).to_string(),
            edition,
            faculty_id: doc.field_value("faculty-id").map(str::to_string),
            canonical_author: doc.field_value("canonical-author").map(str::to_string),
            entry_type,
            word_target: target,
            topics: doc.topics(),
            has_placeholder: doc.has_placeholder(),
        }
    }

    /// Assigned, attributed, and still awaiting canonical text.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.faculty_id.is_some() && self.canonical_author.is_some() && self.has_placeholder
    }

    /// Prompt inputs for drafting this entry.
    #[must_use]
    pub fn prompt_spec(&self) -> EntryPromptSpec {
        EntryPromptSpec {
            title: self.title.clone(),
            edition: self.edition,
            entry_type: self.entry_type,
            word_target: Some(self.word_target.clone()),
            topics: self.topics.clone(),
        }
    }
}
