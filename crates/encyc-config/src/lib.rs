//! Configuration for the encyclopaedia pipeline.
//!
//! - [`Config`]: layered settings (CLI > `.encyclopaedia/config.toml` > defaults)
//! - [`Registry`]: volumes, topic assignments, author names and reviewer policy
//! - [`credentials`]: environment-only secrets for the remote services

pub mod credentials;
mod discovery;
mod model;
pub mod registry;

pub use credentials::{FacultyCredentials, evaluator_api_key, resolve_faculty_credentials};
pub use model::{
    CliArgs, Config, ConfigSource, EvaluatorConfig, FacultyConfig, GenerationConfig,
    PacingConfig, PathsConfig, PublishConfig,
};
pub use registry::{Registry, ReviewerPolicy, TopicAssignment, Volume, fallback_author_name};
