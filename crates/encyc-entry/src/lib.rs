//! AsciiDoc entry files: where they live, how stubs are written, and how
//! generated text is stitched back in.
//!
//! All rewrites preserve every byte outside the span being changed.

pub mod document;
pub mod materializer;
pub mod metadata;
pub mod patcher;
pub mod resolver;

pub use document::Document;
pub use materializer::{EnsureOutcome, apply_assignment, ensure_entry, render_stub, title_from_slug};
pub use metadata::EntryMetadata;
pub use patcher::{
    MarginaliaNote, append_marginalia, patch_canonical, render_marginalia, word_count,
};
pub use resolver::{EntryTarget, author_suffix, entries_dir, entry_path, entry_slug, resolve};
