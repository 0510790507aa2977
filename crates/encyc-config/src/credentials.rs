//! Credentials come from the environment only; nothing here reads files.

use encyc_utils::error::ConfigError;

use crate::model::{EvaluatorConfig, FacultyConfig};

/// Base URL and key for the ask-faculty function.
#[derive(Clone, PartialEq, Eq)]
pub struct FacultyCredentials {
    pub base_url: String,
    pub key: String,
}

impl std::fmt::Debug for FacultyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacultyCredentials")
            .field("base_url", &self.base_url)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Resolve ask-faculty credentials from the process environment.
pub fn resolve_faculty_credentials(
    config: &FacultyConfig,
) -> Result<FacultyCredentials, ConfigError> {
    resolve_faculty_credentials_with(config, |name| std::env::var(name).ok())
}

/// Resolve ask-faculty credentials through an arbitrary lookup.
///
/// The first non-empty variable in each list wins.
pub fn resolve_faculty_credentials_with<F>(
    config: &FacultyConfig,
    lookup: F,
) -> Result<FacultyCredentials, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let base_url = first_set(&config.url_env, &lookup).ok_or_else(|| {
        ConfigError::MissingCredential {
            env_vars: config.url_env.join(", "),
        }
    })?;
    let key = first_set(&config.key_env, &lookup).ok_or_else(|| {
        ConfigError::MissingCredential {
            env_vars: config.key_env.join(", "),
        }
    })?;

    Ok(FacultyCredentials {
        base_url: base_url.trim_end_matches('/').to_string(),
        key,
    })
}

/// Evaluator API key, or `None` when the evaluator should run disabled.
#[must_use]
pub fn evaluator_api_key(config: &EvaluatorConfig) -> Option<String> {
    std::env::var(&config.api_key_env)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

fn first_set<F>(names: &[String], lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names
        .iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.trim().is_empty())
}
