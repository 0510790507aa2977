//! Faculty registry: the single table of volumes, topic assignments, author
//! display names and reviewer policy.
//!
//! Loaded once at startup and passed by reference to every component that needs
//! it. The built-in table is embedded from `data/registry.toml`; `[paths]
//! registry` in the configuration file can replace it.

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

use encyc_utils::error::ConfigError;
use encyc_utils::types::MarginaliaKind;

const EMBEDDED_REGISTRY: &str = include_str!("../data/registry.toml");

/// Prefix shared by every faculty author id.
pub const AUTHOR_PREFIX: &str = "a.";

/// A topic and its ordered authors. Index 0 is the primary author.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TopicAssignment {
    pub slug: String,
    pub authors: Vec<String>,
}

impl TopicAssignment {
    #[must_use]
    pub fn primary_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }
}

/// One volume of the encyclopaedia.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Volume {
    pub number: u32,
    pub slug: String,
    pub numeral: String,
    pub title: String,
    #[serde(default)]
    pub topics: Vec<TopicAssignment>,
}

impl Volume {
    #[must_use]
    pub fn topic(&self, slug: &str) -> Option<&TopicAssignment> {
        self.topics.iter().find(|t| t.slug == slug)
    }
}

/// Who may be asked to review, and how their marginalia are classified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReviewerPolicy {
    /// Random-selection pool, in order.
    #[serde(default)]
    pub pool: Vec<String>,
    /// Topic slug → default reviewer pair.
    #[serde(default)]
    pub defaults: BTreeMap<String, Vec<String>>,
    /// Reviewer id → marginalia kind. Absent ids get `clarification`.
    #[serde(default)]
    pub kinds: BTreeMap<String, MarginaliaKind>,
}

impl ReviewerPolicy {
    #[must_use]
    pub fn kind_for(&self, reviewer_id: &str) -> MarginaliaKind {
        self.kinds
            .get(reviewer_id)
            .copied()
            .unwrap_or(MarginaliaKind::Clarification)
    }

    #[must_use]
    pub fn default_pair(&self, topic_slug: &str) -> Option<&[String]> {
        self.defaults.get(topic_slug).map(Vec::as_slice)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryFile {
    volumes: Vec<Volume>,
    #[serde(default)]
    reviewers: ReviewerPolicy,
    #[serde(default)]
    authors: BTreeMap<String, String>,
}

/// Volumes, topic assignments, author directory and reviewer policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    volumes: Vec<Volume>,
    authors: BTreeMap<String, String>,
    reviewers: ReviewerPolicy,
}

impl Registry {
    /// The built-in registry.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml_str(EMBEDDED_REGISTRY)
    }

    /// Load the registry from `path`, or the built-in one when `None`.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read registry: {path}"))?;
                let registry = Self::from_toml_str(&content)
                    .with_context(|| format!("Failed to load registry: {path}"))?;
                Ok(registry)
            }
            None => Ok(Self::embedded()?),
        }
    }

    /// Parse and validate a registry table.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: RegistryFile =
            toml::from_str(content).map_err(|e| ConfigError::InvalidRegistry(e.to_string()))?;

        let registry = Self {
            volumes: file.volumes,
            authors: file.authors,
            reviewers: file.reviewers,
        };
        registry.validate()?;

        let unknown = registry.unknown_authors();
        if !unknown.is_empty() {
            tracing::warn!(
                count = unknown.len(),
                authors = %unknown.join(", "),
                "Registry references authors with no display name"
            );
        }

        Ok(registry)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut numbers = HashSet::new();
        let mut slugs = HashSet::new();
        for volume in &self.volumes {
            if !numbers.insert(volume.number) {
                return Err(ConfigError::InvalidRegistry(format!(
                    "duplicate volume number {}",
                    volume.number
                )));
            }
            if !slugs.insert(volume.slug.as_str()) {
                return Err(ConfigError::InvalidRegistry(format!(
                    "duplicate volume slug {}",
                    volume.slug
                )));
            }
            let mut topics = HashSet::new();
            for topic in &volume.topics {
                if !topics.insert(topic.slug.as_str()) {
                    return Err(ConfigError::InvalidRegistry(format!(
                        "duplicate topic {} in {}",
                        topic.slug, volume.slug
                    )));
                }
                if topic.authors.is_empty() {
                    return Err(ConfigError::InvalidRegistry(format!(
                        "topic {} in {} has no authors",
                        topic.slug, volume.slug
                    )));
                }
            }
        }
        for (topic, pair) in &self.reviewers.defaults {
            if pair.len() != 2 || pair[0] == pair[1] {
                return Err(ConfigError::InvalidRegistry(format!(
                    "default reviewers for {topic} must be two distinct ids"
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    /// Volume by number (1-based).
    #[must_use]
    pub fn volume(&self, number: u32) -> Option<&Volume> {
        self.volumes.iter().find(|v| v.number == number)
    }

    #[must_use]
    pub fn volume_by_slug(&self, slug: &str) -> Option<&Volume> {
        self.volumes.iter().find(|v| v.slug == slug)
    }

    /// Volume slug for a number, `None` when the number is not in the table.
    #[must_use]
    pub fn volume_slug(&self, number: u32) -> Option<&str> {
        self.volume(number).map(|v| v.slug.as_str())
    }

    /// Ordered authors for a topic within a volume.
    #[must_use]
    pub fn assignment(&self, volume_slug: &str, topic_slug: &str) -> Option<&TopicAssignment> {
        self.volume_by_slug(volume_slug)
            .and_then(|v| v.topic(topic_slug))
    }

    /// Display name for an author id. Never fails.
    #[must_use]
    pub fn author_name(&self, author_id: &str) -> String {
        self.authors
            .get(author_id)
            .cloned()
            .unwrap_or_else(|| fallback_author_name(author_id))
    }

    #[must_use]
    pub fn reviewers(&self) -> &ReviewerPolicy {
        &self.reviewers
    }

    /// Assigned authors with no directory entry, sorted and deduplicated.
    #[must_use]
    pub fn unknown_authors(&self) -> Vec<String> {
        let mut unknown: Vec<String> = self
            .volumes
            .iter()
            .flat_map(|v| v.topics.iter())
            .flat_map(|t| t.authors.iter())
            .filter(|id| !self.authors.contains_key(id.as_str()))
            .cloned()
            .collect();
        unknown.sort();
        unknown.dedup();
        unknown
    }
}

/// De-slugified id: `a.` prefix stripped, hyphens become spaces.
#[must_use]
pub fn fallback_author_name(author_id: &str) -> String {
    author_id
        .strip_prefix(AUTHOR_PREFIX)
        .unwrap_or(author_id)
        .replace('-', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_registry_loads() {
        let registry = Registry::embedded().unwrap();

        assert_eq!(registry.volumes().len(), 12);
        assert_eq!(registry.volume_slug(1), Some("volume-01-mind"));
        assert_eq!(registry.volume_slug(12), Some("volume-12-limits"));
        assert_eq!(registry.volume(6).unwrap().title, "Art & Form");
        assert_eq!(registry.volume(9).unwrap().numeral, "IX");
        assert!(registry.volume(13).is_none());
    }

    #[test]
    fn test_embedded_registry_has_no_unknown_authors() {
        let registry = Registry::embedded().unwrap();
        assert!(registry.unknown_authors().is_empty());
    }

    #[test]
    fn test_topic_order_is_preserved() {
        let registry = Registry::embedded().unwrap();
        let mind = registry.volume(1).unwrap();
        let slugs: Vec<_> = mind.topics.iter().map(|t| t.slug.as_str()).collect();
        assert_eq!(slugs, vec!["consciousness", "mind", "attention", "self"]);

        let attention = registry.assignment("volume-01-mind", "attention").unwrap();
        assert_eq!(attention.authors, vec!["a.james", "a.simon"]);
        assert_eq!(attention.primary_author(), Some("a.james"));
    }

    #[test]
    fn test_author_name_lookup_and_fallback() {
        let registry = Registry::embedded().unwrap();
        assert_eq!(registry.author_name("a.james"), "William James");
        assert_eq!(registry.author_name("a.merleau-ponty"), "Maurice Merleau-Ponty");
        assert_eq!(registry.author_name("a.new-comer"), "new comer");
        assert_eq!(fallback_author_name("plain"), "plain");
    }

    #[test]
    fn test_reviewer_policy() {
        let registry = Registry::embedded().unwrap();
        let policy = registry.reviewers();
        assert_eq!(policy.pool.len(), 10);
        assert_eq!(
            policy.default_pair("attention").unwrap(),
            &["a.simon".to_string(), "a.weil".to_string()]
        );
        assert_eq!(policy.kind_for("a.weil"), MarginaliaKind::Heretic);
        assert_eq!(policy.kind_for("a.kant"), MarginaliaKind::Clarification);
    }

    #[test]
    fn test_duplicate_volume_rejected() {
        let table = r#"
[[volumes]]
number = 1
slug = "volume-01-mind"
numeral = "I"
title = "Mind"

[[volumes]]
number = 1
slug = "volume-01-other"
numeral = "I"
title = "Other"
"#;
        let err = Registry::from_toml_str(table).unwrap_err();
        assert!(err.to_string().contains("duplicate volume number"));
    }

    #[test]
    fn test_topic_without_authors_rejected() {
        let table = r#"
[[volumes]]
number = 1
slug = "volume-01-mind"
numeral = "I"
title = "Mind"

[[volumes.topics]]
slug = "empty"
authors = []
"#;
        let err = Registry::from_toml_str(table).unwrap_err();
        assert!(err.to_string().contains("has no authors"));
    }

    #[test]
    fn test_minimal_registry_without_reviewers() {
        let table = r#"
[[volumes]]
number = 3
slug = "volume-03-nature"
numeral = "III"
title = "Nature"

[[volumes.topics]]
slug = "life"
authors = ["a.bergson"]
"#;
        let registry = Registry::from_toml_str(table).unwrap();
        assert_eq!(registry.volume_slug(3), Some("volume-03-nature"));
        assert_eq!(registry.author_name("a.bergson"), "bergson");
        assert!(registry.reviewers().pool.is_empty());
        assert_eq!(registry.unknown_authors(), vec!["a.bergson".to_string()]);
    }
}
