//! Domain enums shared across the pipeline.
//!
//! String forms are derived with `strum` so that CLI parsing, file fields
//! and prompt text all agree on one spelling.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Audience edition of the encyclopaedia.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Edition {
    Adult,
    Children,
}

impl Edition {
    /// Both editions, adult first.
    pub const ALL: [Edition; 2] = [Edition::Adult, Edition::Children];
}

/// Edition filter accepted by batch-style commands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EditionSelection {
    Adult,
    Children,
    #[default]
    Both,
}

impl EditionSelection {
    /// Expand the selection into concrete editions, adult first.
    #[must_use]
    pub fn editions(self) -> Vec<Edition> {
        match self {
            Self::Adult => vec![Edition::Adult],
            Self::Children => vec![Edition::Children],
            Self::Both => Edition::ALL.to_vec(),
        }
    }
}

impl From<Edition> for EditionSelection {
    fn from(edition: Edition) -> Self {
        match edition {
            Edition::Adult => Self::Adult,
            Edition::Children => Self::Children,
        }
    }
}

/// Kind of entry, which drives length targets and token budgets.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EntryType {
    Major,
    #[default]
    Standard,
    Boundary,
    Closing,
}

impl EntryType {
    /// Parse an entry-type field, treating anything unrecognised as `Standard`.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        raw.trim().parse().unwrap_or_default()
    }

    /// Upper-case label used in prompts ("MAJOR", "STANDARD", ...).
    #[must_use]
    pub fn upper_label(self) -> String {
        self.to_string().to_uppercase()
    }
}

/// Classification attached to a marginalia block.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MarginaliaKind {
    Objection,
    Clarification,
    Extension,
    Crossref,
    Correction,
    Heretic,
    Synthetic,
}

impl MarginaliaKind {
    /// Short description woven into the marginalia prompt.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Objection => "a scholarly objection or counterpoint",
            Self::Clarification => "a clarification or elaboration",
            Self::Extension => "an extension or related point",
            Self::Crossref => "a cross-reference to related concepts",
            Self::Correction => "a factual correction",
            Self::Heretic => "a heretical or alternative perspective",
            Self::Synthetic => "a synthetic or integrative comment",
        }
    }
}

/// Conversation mode tag sent with every generation request.
///
/// The tag is passed through to the service untouched.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GenerationMode {
    Lecture,
    OfficeHours,
    Polemic,
}
