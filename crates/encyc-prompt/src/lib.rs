//! Prompt composition for the encyclopaedia pipeline.
//!
//! Everything here is pure: the same inputs always produce the same prompt
//! text, and nothing touches the network or the filesystem.

pub mod entry;
pub mod review;
pub mod targets;

pub use entry::{EntryPromptSpec, build_entry_prompt};
pub use review::{
    FidelityPromptSpec, build_fidelity_prompt, build_marginalia_prompt, build_review_prompt,
    build_revision_prompt, excerpt,
};
pub use targets::{Target, max_tokens, target_for, word_target};
