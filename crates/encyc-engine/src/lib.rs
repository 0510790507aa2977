//! Workflows of the encyclopaedia pipeline.
//!
//! Each module drives one CLI command over the shared [`PipelineContext`]:
//!
//! - [`assignments`]: materialize the registry's topic assignments as entry files
//! - [`catalog`]: emit the site's entry table rows
//! - [`draft`]: single-pass generation, no review
//! - [`workflow`]: the eight-stage generation-with-review workflow
//! - [`batch`]: the review workflow over every pending entry, with publishing
//! - [`publish`]: git stage, commit and push
//!
//! Remote calls are strictly sequential with fixed pauses between them.

pub mod assignments;
pub mod batch;
pub mod catalog;
mod context;
pub mod draft;
pub mod publish;
pub mod reviewers;
pub mod workflow;

pub use context::{PipelineContext, RunTally, entry_files, pause};
pub use workflow::{ReviewRequest, ReviewWorkflow, Stage, WorkflowError, WorkflowReport};
