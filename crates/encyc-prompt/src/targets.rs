//! Length targets and token budgets per entry type and edition.

use encyc_utils::types::{Edition, EntryType};
use serde::Serialize;

/// Word range and token budget for one entry type in one edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Target {
    pub words: &'static str,
    pub max_tokens: u32,
}

/// Fixed target table.
///
/// | type     | adult     | children | max tokens |
/// |----------|-----------|----------|------------|
/// | major    | 4000-6000 | 750-1500 | 8000       |
/// | standard | 2000-3000 | 500-1000 | 4000       |
/// | boundary | 3000-4000 | 750-1250 | 6000       |
/// | closing  | 1000-2000 | 250-500  | 2000       |
#[must_use]
pub fn target_for(entry_type: EntryType, edition: Edition) -> Target {
    let words = match (entry_type, edition) {
        (EntryType::Major, Edition::Adult) => "4000-6000",
        (EntryType::Standard, Edition::Adult) => "2000-3000",
        (EntryType::Boundary, Edition::Adult) => "3000-4000",
        (EntryType::Closing, Edition::Adult) => "1000-2000",
        (EntryType::Major, Edition::Children) => "750-1500",
        (EntryType::Standard, Edition::Children) => "500-1000",
        (EntryType::Boundary, Edition::Children) => "750-1250",
        (EntryType::Closing, Edition::Children) => "250-500",
    };
    Target {
        words,
        max_tokens: max_tokens(entry_type),
    }
}

/// Token budget for drafting or revising an entry of this type.
#[must_use]
pub fn max_tokens(entry_type: EntryType) -> u32 {
    match entry_type {
        EntryType::Major => 8000,
        EntryType::Standard => 4000,
        EntryType::Boundary => 6000,
        EntryType::Closing => 2000,
    }
}

#[must_use]
pub fn word_target(entry_type: EntryType, edition: Edition) -> &'static str {
    target_for(entry_type, edition).words
}
